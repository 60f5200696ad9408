// Target availability probing

use serde::Serialize;

use crate::executor::LoadClient;
use crate::target::Target;

/// Outcome of probing one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetStatus {
    #[serde(flatten)]
    pub target: Target,
    pub available: bool,
}

/// Probe outcomes in configured order
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProbeReport {
    pub targets: Vec<TargetStatus>,
}

impl ProbeReport {
    pub fn checked(&self) -> usize {
        self.targets.len()
    }

    pub fn available(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter().filter(|s| s.available).map(|s| &s.target)
    }

    pub fn unavailable(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter().filter(|s| !s.available).map(|s| &s.target)
    }

    pub fn any_available(&self) -> bool {
        self.targets.iter().any(|s| s.available)
    }
}

/// Probe each target once, sequentially and in list order
pub async fn probe_targets<C: LoadClient + ?Sized>(client: &C, targets: &[Target]) -> ProbeReport {
    let mut report = ProbeReport::default();

    for target in targets {
        let available = client.is_available(target).await;
        if available {
            tracing::info!(server = %target.name, url = %target.base_url, "Target is available");
        } else {
            tracing::warn!(server = %target.name, url = %target.base_url, "Target is not available");
        }
        report.targets.push(TargetStatus {
            target: target.clone(),
            available,
        });
    }

    report
}
