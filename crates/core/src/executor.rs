// Request executor
//
// Design Decision: Success is decided by transport completion and body decoding only.
// The HTTP status code is recorded but never consulted, so a target answering
// every request with a decodable 500 still counts as successful.
// Design Decision: Exactly one attempt per call, no retries at this layer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::time::Instant;

use crate::error::{BenchError, ExchangeError};
use crate::operation::{Call, Operation, ResourceId};
use crate::target::Target;

/// Outcome record of one issued HTTP exchange
#[derive(Debug, Clone, PartialEq)]
pub struct RequestResult {
    pub operation: Operation,
    /// HTTP status, 0 when no response was obtained
    pub status: u16,
    /// Elapsed time on the monotonic clock, up to completion or failure
    pub duration: Duration,
    pub success: bool,
    /// Decoded response body (absent for DELETE and for failures)
    pub payload: Option<Value>,
    pub error: Option<String>,
}

impl RequestResult {
    pub fn succeeded(
        operation: Operation,
        status: u16,
        duration: Duration,
        payload: Option<Value>,
    ) -> Self {
        Self {
            operation,
            status,
            duration,
            success: true,
            payload,
            error: None,
        }
    }

    pub fn failed(operation: Operation, duration: Duration, error: impl Into<String>) -> Self {
        Self {
            operation,
            status: 0,
            duration,
            success: false,
            payload: None,
            error: Some(error.into()),
        }
    }

    /// Identifier carried by the response payload, if any
    pub fn resource_id(&self) -> Option<ResourceId> {
        resource_id_of(self.payload.as_ref()?)
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration.as_secs_f64() * 1000.0
    }
}

fn resource_id_of(payload: &Value) -> Option<ResourceId> {
    payload
        .get("id")
        .and_then(Value::as_u64)
        .filter(|id| *id > 0)
}

/// Issues CRUD calls against targets.
///
/// Drivers only talk to targets through this trait, so they can be driven by
/// a fake client in tests.
#[async_trait]
pub trait LoadClient: Send + Sync {
    /// Perform exactly one exchange for `call` and report its outcome
    async fn execute(&self, target: &Target, call: Call) -> RequestResult;

    /// Single bounded-timeout health check
    async fn is_available(&self, target: &Target) -> bool;
}

/// `LoadClient` over a pooled reqwest client.
///
/// Build one per suite run; dropping it releases the connection pool.
pub struct HttpClient {
    http: reqwest::Client,
    probe_timeout: Duration,
}

impl HttpClient {
    pub fn new(request_timeout: Duration, probe_timeout: Duration) -> Result<Self, BenchError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(BenchError::ClientBuild)?;

        Ok(Self {
            http,
            probe_timeout,
        })
    }

    async fn exchange(
        &self,
        target: &Target,
        call: Call,
    ) -> Result<(u16, Option<Value>), ExchangeError> {
        let request = match call {
            Call::Create { seq } => self.http.post(target.url("/users")).json(&json!({
                "name": format!("User {}", seq),
                "email": format!("user{}@example.com", seq),
            })),
            Call::GetAll => self.http.get(target.url("/users")),
            Call::GetOne { id } => self.http.get(target.url(&format!("/users/{}", id))),
            Call::Update { id } => self
                .http
                .put(target.url(&format!("/users/{}", id)))
                .json(&json!({ "name": format!("Updated User {}", id) })),
            Call::Delete { id } => self.http.delete(target.url(&format!("/users/{}", id))),
        };

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        // Acknowledgement only; a 204 has nothing to decode
        if let Call::Delete { .. } = call {
            return Ok((status, None));
        }

        let payload: Value = serde_json::from_slice(&body)?;
        if let Call::Create { .. } = call {
            if resource_id_of(&payload).is_none() {
                return Err(ExchangeError::MissingId);
            }
        }

        Ok((status, Some(payload)))
    }
}

#[async_trait]
impl LoadClient for HttpClient {
    async fn execute(&self, target: &Target, call: Call) -> RequestResult {
        let operation = call.operation();
        let start = Instant::now();
        let outcome = self.exchange(target, call).await;
        let duration = start.elapsed();

        match outcome {
            Ok((status, payload)) => RequestResult::succeeded(operation, status, duration, payload),
            Err(e) => {
                tracing::debug!(
                    server = %target.name,
                    operation = %operation,
                    error = %e,
                    "Request failed"
                );
                RequestResult::failed(operation, duration, e.to_string())
            }
        }
    }

    async fn is_available(&self, target: &Target) -> bool {
        let result = self
            .http
            .get(target.url("/users"))
            .timeout(self.probe_timeout)
            .send()
            .await;

        match result {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                tracing::debug!(server = %target.name, error = %e, "Availability probe failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_id_requires_positive_integer() {
        let ok = RequestResult::succeeded(
            Operation::Create,
            201,
            Duration::from_millis(3),
            Some(json!({ "id": 42, "name": "User 1" })),
        );
        assert_eq!(ok.resource_id(), Some(42));

        for payload in [json!({ "id": 0 }), json!({ "id": "42" }), json!({ "message": "x" })] {
            let result = RequestResult::succeeded(
                Operation::Create,
                500,
                Duration::ZERO,
                Some(payload),
            );
            assert_eq!(result.resource_id(), None);
        }
    }

    #[test]
    fn test_failed_result_records_zero_status() {
        let result = RequestResult::failed(
            Operation::GetOne,
            Duration::from_millis(250),
            "transport error: connection refused",
        );
        assert_eq!(result.status, 0);
        assert!(!result.success);
        assert_eq!(result.duration_ms(), 250.0);
        assert!(result.payload.is_none());
    }
}
