//! Stateful retry policies, one per retryable failure class.
//!
//! A policy instance lives for exactly one orchestrator call: it is created
//! when the call starts, consulted after each classified failure, and dropped
//! when the call returns. Budgets therefore never leak between calls.

mod endpoint_discovery;
mod partition_key_mismatch;
mod session_read;
mod throttle;

use std::time::Duration;

use super::error::DocumentClientError;

pub use endpoint_discovery::EndpointDiscoveryRetryPolicy;
pub use partition_key_mismatch::PartitionKeyMismatchRetryPolicy;
pub use session_read::SessionReadRetryPolicy;
pub use throttle::ResourceThrottleRetryPolicy;

/// Decision object for one class of failure.
///
/// `Request` is whatever the orchestrator lets the policy correct between
/// attempts: the in-flight [`ServiceRequest`](crate::client::ServiceRequest)
/// on the generic path, `()` on the create path.
pub trait RetryPolicy {
    type Request: ?Sized;

    /// Whether the failed attempt should be re-issued. A `true` answer
    /// consumes budget and may update the request in place.
    fn should_retry(&mut self, error: &DocumentClientError, request: &mut Self::Request) -> bool;

    /// Wait before the next attempt, as decided by the last positive `should_retry`.
    fn retry_after(&self) -> Duration;
}
