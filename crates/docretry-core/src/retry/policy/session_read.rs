//! 404/ReadSessionNotAvailable: reroute the read to each remaining read region in turn.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use crate::client::{Endpoint, EndpointManager, ServiceRequest};
use crate::retry::error::DocumentClientError;

use super::RetryPolicy;

/// Retries 404/ReadSessionNotAvailable against the remaining read regions.
///
/// The candidate list is taken from the endpoint manager on the first failure,
/// minus the endpoint the request was already using. Every granted retry points
/// `request.endpoint_override` at the next candidate; no other request field is
/// touched. Retries are immediate.
pub struct SessionReadRetryPolicy {
    endpoint_manager: Arc<dyn EndpointManager>,
    candidates: Option<VecDeque<Endpoint>>,
    attempts: u32,
}

impl SessionReadRetryPolicy {
    pub fn new(endpoint_manager: Arc<dyn EndpointManager>) -> Self {
        Self {
            endpoint_manager,
            candidates: None,
            attempts: 0,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    fn snapshot_candidates(&self, request: &ServiceRequest) -> VecDeque<Endpoint> {
        let current = request
            .endpoint_override
            .clone()
            .unwrap_or_else(|| self.endpoint_manager.read_endpoint());
        let mut candidates: VecDeque<Endpoint> = VecDeque::new();
        for endpoint in self.endpoint_manager.read_endpoints() {
            if endpoint != current && !candidates.contains(&endpoint) {
                candidates.push_back(endpoint);
            }
        }
        candidates
    }
}

impl RetryPolicy for SessionReadRetryPolicy {
    type Request = ServiceRequest;

    fn should_retry(&mut self, _error: &DocumentClientError, request: &mut ServiceRequest) -> bool {
        if self.candidates.is_none() {
            self.candidates = Some(self.snapshot_candidates(request));
        }
        let Some(next) = self.candidates.as_mut().and_then(VecDeque::pop_front) else {
            return false;
        };
        tracing::debug!(endpoint = %next, "rerouting session read");
        request.endpoint_override = Some(next);
        self.attempts += 1;
        true
    }

    fn retry_after(&self) -> Duration {
        Duration::ZERO
    }
}
