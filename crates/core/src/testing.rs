// In-process LoadClient for driver tests

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;

use crate::executor::{LoadClient, RequestResult};
use crate::operation::Call;
use crate::target::Target;

type CreatePredicate = Box<dyn Fn(u64) -> bool + Send + Sync>;

/// Answers every call after a fixed latency on the tokio clock.
///
/// Creates return `{"id": seq + offset}`; everything else returns `{}`.
pub(crate) struct FakeClient {
    latency: Duration,
    failing_creates: Option<CreatePredicate>,
    id_offset: u64,
    down: HashSet<String>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: Mutex<Vec<Call>>,
    probes: Mutex<Vec<String>>,
}

impl FakeClient {
    pub(crate) fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            failing_creates: None,
            id_offset: 0,
            down: HashSet::new(),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
            probes: Mutex::new(Vec::new()),
        }
    }

    /// Fail creates whose sequence number matches
    pub(crate) fn failing_creates(mut self, predicate: impl Fn(u64) -> bool + Send + Sync + 'static) -> Self {
        self.failing_creates = Some(Box::new(predicate));
        self
    }

    pub(crate) fn id_offset(mut self, offset: u64) -> Self {
        self.id_offset = offset;
        self
    }

    /// Report the named target as unavailable
    pub(crate) fn down(mut self, name: &str) -> Self {
        self.down.insert(name.to_string());
        self
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Calls in dispatch order
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Names of probed targets in probe order
    pub(crate) fn probes(&self) -> Vec<String> {
        self.probes.lock().clone()
    }
}

#[async_trait]
impl LoadClient for FakeClient {
    async fn execute(&self, _target: &Target, call: Call) -> RequestResult {
        self.calls.lock().push(call);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.latency).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let operation = call.operation();
        match call {
            Call::Create { seq } => {
                let fails = self.failing_creates.as_ref().is_some_and(|f| f(seq));
                if fails {
                    RequestResult::failed(operation, self.latency, "transport error: refused")
                } else {
                    let payload = json!({ "id": seq + self.id_offset });
                    RequestResult::succeeded(operation, 201, self.latency, Some(payload))
                }
            }
            Call::Delete { .. } => RequestResult::succeeded(operation, 204, self.latency, None),
            _ => RequestResult::succeeded(operation, 200, self.latency, Some(json!({}))),
        }
    }

    async fn is_available(&self, target: &Target) -> bool {
        self.probes.lock().push(target.name.clone());
        !self.down.contains(&target.name)
    }
}
