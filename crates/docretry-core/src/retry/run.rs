//! Retry loops: re-issue a delegate until it succeeds or the matching policy says stop.

use crate::client::{ClientContext, ServiceRequest};

use super::classify::{classify, ErrorKind};
use super::error::DocumentClientError;
use super::policy::{
    EndpointDiscoveryRetryPolicy, PartitionKeyMismatchRetryPolicy, ResourceThrottleRetryPolicy,
    RetryPolicy, SessionReadRetryPolicy,
};
use super::sleep::{SleepOutcome, Sleeper, ThreadSleeper};

/// One attempt of an arbitrary service request.
pub trait RetryRequestDelegate<R> {
    fn apply(&mut self, request: &ServiceRequest) -> Result<R, DocumentClientError>;
}

impl<R, F> RetryRequestDelegate<R> for F
where
    F: FnMut(&ServiceRequest) -> Result<R, DocumentClientError>,
{
    fn apply(&mut self, request: &ServiceRequest) -> Result<R, DocumentClientError> {
        self(request)
    }
}

/// One attempt of "create this document".
pub trait RetryCreateDocumentDelegate<R> {
    fn apply(&mut self) -> Result<R, DocumentClientError>;
}

impl<R, F> RetryCreateDocumentDelegate<R> for F
where
    F: FnMut() -> Result<R, DocumentClientError>,
{
    fn apply(&mut self) -> Result<R, DocumentClientError> {
        self()
    }
}

/// Runs delegates under the client's retry policies, waiting via `S`.
#[derive(Debug, Default, Clone)]
pub struct RetryExecutor<S = ThreadSleeper> {
    sleeper: S,
}

impl RetryExecutor<ThreadSleeper> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: Sleeper> RetryExecutor<S> {
    pub fn with_sleeper(sleeper: S) -> Self {
        Self { sleeper }
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Execute `delegate` against `request`, retrying classified failures.
    ///
    /// On 403/WriteForbidden, 429 and 404/ReadSessionNotAvailable the matching
    /// policy decides; every other error, and any error whose policy is out of
    /// budget, is returned as-is. The same `request` is passed to every
    /// attempt, so reroutes made by a policy stay in effect.
    pub fn execute<R, D>(
        &self,
        mut delegate: D,
        client: &ClientContext,
        request: &mut ServiceRequest,
    ) -> Result<R, DocumentClientError>
    where
        D: RetryRequestDelegate<R>,
    {
        let mut discovery = EndpointDiscoveryRetryPolicy::new(
            client.endpoint_manager().clone(),
            client.connection_policy(),
        );
        let mut throttle =
            ResourceThrottleRetryPolicy::from_options(&client.connection_policy().retry_options);
        let mut session_read = SessionReadRetryPolicy::new(client.endpoint_manager().clone());

        let mut attempt = 1u32;
        loop {
            let e = match delegate.apply(request) {
                Ok(response) => return Ok(response),
                Err(e) => e,
            };

            let kind = classify(&e);
            let policy: &mut dyn RetryPolicy<Request = ServiceRequest> = match kind {
                ErrorKind::WriteForbidden => &mut discovery,
                ErrorKind::Throttled => &mut throttle,
                ErrorKind::ReadSessionNotAvailable => &mut session_read,
                ErrorKind::PartitionKeyMismatch | ErrorKind::Other => {
                    tracing::debug!(
                        status = e.status_code(),
                        sub_status = ?e.sub_status_code(),
                        attempt,
                        "non-retryable error"
                    );
                    return Err(e);
                }
            };

            if !policy.should_retry(&e, request) {
                tracing::debug!(
                    status = e.status_code(),
                    sub_status = ?e.sub_status_code(),
                    attempt,
                    ?kind,
                    "retry budget exhausted"
                );
                return Err(e);
            }
            self.delay_for_retry(&*policy, kind, attempt);
            attempt += 1;
        }
    }

    /// Execute a document-create `delegate`, retrying only partition-key mismatches.
    ///
    /// The cached partition-key definition for `resource_path` is refreshed
    /// before the single retry. Every other error is returned as-is.
    pub fn execute_create_document<R, D>(
        &self,
        mut delegate: D,
        client: &ClientContext,
        resource_path: &str,
    ) -> Result<R, DocumentClientError>
    where
        D: RetryCreateDocumentDelegate<R>,
    {
        let mut key_mismatch = PartitionKeyMismatchRetryPolicy::new(
            resource_path,
            client.partition_key_definitions().clone(),
        );

        let mut attempt = 1u32;
        loop {
            let e = match delegate.apply() {
                Ok(response) => return Ok(response),
                Err(e) => e,
            };

            let kind = classify(&e);
            if kind != ErrorKind::PartitionKeyMismatch {
                tracing::debug!(
                    status = e.status_code(),
                    sub_status = ?e.sub_status_code(),
                    attempt,
                    resource_path,
                    "non-retryable create error"
                );
                return Err(e);
            }
            if !key_mismatch.should_retry(&e, &mut ()) {
                tracing::debug!(
                    attempt,
                    resource_path,
                    "partition key mismatch persists after refresh"
                );
                return Err(e);
            }
            self.delay_for_retry(&key_mismatch, kind, attempt);
            attempt += 1;
        }
    }

    fn delay_for_retry<P>(&self, policy: &P, kind: ErrorKind, attempt: u32)
    where
        P: RetryPolicy + ?Sized,
    {
        let delay = policy.retry_after();
        tracing::debug!(?kind, attempt, delay_ms = delay.as_millis() as u64, "retrying");
        if delay.is_zero() {
            return;
        }
        if self.sleeper.sleep(delay) == SleepOutcome::Interrupted {
            tracing::debug!(?kind, attempt, "retry delay interrupted, retrying immediately");
        }
    }
}

/// [`RetryExecutor::execute`] with a blocking thread sleep between attempts.
pub fn execute<R, D>(
    delegate: D,
    client: &ClientContext,
    request: &mut ServiceRequest,
) -> Result<R, DocumentClientError>
where
    D: RetryRequestDelegate<R>,
{
    RetryExecutor::new().execute(delegate, client, request)
}

/// [`RetryExecutor::execute_create_document`] with a blocking thread sleep between attempts.
pub fn execute_create_document<R, D>(
    delegate: D,
    client: &ClientContext,
    resource_path: &str,
) -> Result<R, DocumentClientError>
where
    D: RetryCreateDocumentDelegate<R>,
{
    RetryExecutor::new().execute_create_document(delegate, client, resource_path)
}
