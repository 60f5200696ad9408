// Run the reference CRUD target

use std::net::SocketAddr;

use anyhow::{Context, Result};

pub async fn run(bind: SocketAddr) -> Result<()> {
    crudbench_target::serve_until_shutdown(bind)
        .await
        .with_context(|| format!("Server error on {}", bind))
}
