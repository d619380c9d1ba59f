//! Service error type carrying the status / sub-status pair used for retry classification.

use std::time::Duration;

/// HTTP status codes the retry layer cares about.
pub mod status_codes {
    pub const BAD_REQUEST: u16 = 400;
    pub const FORBIDDEN: u16 = 403;
    pub const NOT_FOUND: u16 = 404;
    pub const TOO_MANY_REQUESTS: u16 = 429;
}

/// Service-specific sub-status codes returned alongside the HTTP status.
pub mod sub_status_codes {
    /// 403: the targeted region no longer accepts writes.
    pub const WRITE_FORBIDDEN: u32 = 3;
    /// 400: the client's partition-key definition is stale.
    pub const PARTITION_KEY_MISMATCH: u32 = 1001;
    /// 404: the replica has not caught up with the requested session token.
    pub const READ_SESSION_NOT_AVAILABLE: u32 = 1002;
}

/// Error returned by a single attempt against the service.
///
/// The `(status_code, sub_status_code)` pair is the only thing the retry
/// layer looks at when picking a policy. The error is handed back to the
/// caller unchanged when retries stop, whichever attempt produced it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (status {status_code}{})", fmt_sub_status(.sub_status_code))]
pub struct DocumentClientError {
    status_code: u16,
    sub_status_code: Option<u32>,
    message: String,
    retry_after: Option<Duration>,
}

fn fmt_sub_status(sub: &Option<u32>) -> String {
    match sub {
        Some(s) => format!(", sub-status {s}"),
        None => String::new(),
    }
}

impl DocumentClientError {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            sub_status_code: None,
            message: message.into(),
            retry_after: None,
        }
    }

    /// Attach a sub-status code.
    pub fn with_sub_status(mut self, sub_status_code: u32) -> Self {
        self.sub_status_code = Some(sub_status_code);
        self
    }

    /// Attach the server's suggested wait before retrying (`x-ms-retry-after-ms`).
    pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
        self.retry_after = Some(retry_after);
        self
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn sub_status_code(&self) -> Option<u32> {
        self.sub_status_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Server-suggested delay, if the response carried one.
    pub fn retry_after(&self) -> Option<Duration> {
        self.retry_after
    }
}
