//! 403/WriteForbidden: refresh the region topology and retry against the new write region.

use std::sync::Arc;
use std::time::Duration;

use crate::client::{EndpointManager, ServiceRequest};
use crate::config::ConnectionPolicy;
use crate::retry::error::DocumentClientError;

use super::RetryPolicy;

const MAX_RETRY_COUNT: u32 = 120;
const RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Retries writes rejected with 403/WriteForbidden after refreshing the
/// region topology, so the next attempt goes to the new write region.
pub struct EndpointDiscoveryRetryPolicy {
    endpoint_manager: Arc<dyn EndpointManager>,
    enabled: bool,
    max_retry_count: u32,
    attempts: u32,
}

impl EndpointDiscoveryRetryPolicy {
    pub fn new(
        endpoint_manager: Arc<dyn EndpointManager>,
        connection_policy: &ConnectionPolicy,
    ) -> Self {
        Self {
            endpoint_manager,
            enabled: connection_policy.enable_endpoint_discovery,
            max_retry_count: MAX_RETRY_COUNT,
            attempts: 0,
        }
    }

    /// Override the retry bound (defaults to 120).
    pub fn with_max_retry_count(mut self, max_retry_count: u32) -> Self {
        self.max_retry_count = max_retry_count;
        self
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

impl RetryPolicy for EndpointDiscoveryRetryPolicy {
    type Request = ServiceRequest;

    fn should_retry(
        &mut self,
        _error: &DocumentClientError,
        _request: &mut ServiceRequest,
    ) -> bool {
        if !self.enabled || self.attempts >= self.max_retry_count {
            return false;
        }
        self.attempts += 1;
        self.endpoint_manager.refresh_endpoint_list();
        true
    }

    fn retry_after(&self) -> Duration {
        RETRY_INTERVAL
    }
}
