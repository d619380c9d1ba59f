//! Classify service errors by `(status, sub-status)` into retry error kinds.

use super::error::{status_codes, sub_status_codes, DocumentClientError};

/// High-level classification of a service error for retry purposes.
///
/// Each orchestrator decides which kinds it has a policy for; everything it
/// does not handle is propagated to the caller on first occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 403 / WriteForbidden: the write region moved.
    WriteForbidden,
    /// 429 with any sub-status: server asked us to slow down.
    Throttled,
    /// 404 / ReadSessionNotAvailable: replica is behind the session token.
    ReadSessionNotAvailable,
    /// 400 / PartitionKeyMismatch: cached partition-key definition is stale.
    PartitionKeyMismatch,
    /// Any other error (never retried).
    Other,
}

/// Classify a raw `(status, sub-status)` pair.
pub fn classify_status(status_code: u16, sub_status_code: Option<u32>) -> ErrorKind {
    match (status_code, sub_status_code) {
        (status_codes::FORBIDDEN, Some(sub_status_codes::WRITE_FORBIDDEN)) => {
            ErrorKind::WriteForbidden
        }
        (status_codes::TOO_MANY_REQUESTS, _) => ErrorKind::Throttled,
        (status_codes::NOT_FOUND, Some(sub_status_codes::READ_SESSION_NOT_AVAILABLE)) => {
            ErrorKind::ReadSessionNotAvailable
        }
        (status_codes::BAD_REQUEST, Some(sub_status_codes::PARTITION_KEY_MISMATCH)) => {
            ErrorKind::PartitionKeyMismatch
        }
        _ => ErrorKind::Other,
    }
}

/// Classify a service error into an ErrorKind.
pub fn classify(e: &DocumentClientError) -> ErrorKind {
    classify_status(e.status_code(), e.sub_status_code())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_needs_write_forbidden_sub_status() {
        assert_eq!(
            classify_status(403, Some(sub_status_codes::WRITE_FORBIDDEN)),
            ErrorKind::WriteForbidden
        );
        assert_eq!(classify_status(403, None), ErrorKind::Other);
        assert_eq!(classify_status(403, Some(1002)), ErrorKind::Other);
    }

    #[test]
    fn http_429_throttled_regardless_of_sub_status() {
        assert_eq!(classify_status(429, None), ErrorKind::Throttled);
        assert_eq!(classify_status(429, Some(3200)), ErrorKind::Throttled);
    }

    #[test]
    fn not_found_needs_read_session_sub_status() {
        assert_eq!(
            classify_status(404, Some(sub_status_codes::READ_SESSION_NOT_AVAILABLE)),
            ErrorKind::ReadSessionNotAvailable
        );
        assert_eq!(classify_status(404, None), ErrorKind::Other);
    }

    #[test]
    fn bad_request_partition_key_mismatch() {
        assert_eq!(
            classify_status(400, Some(sub_status_codes::PARTITION_KEY_MISMATCH)),
            ErrorKind::PartitionKeyMismatch
        );
        assert_eq!(classify_status(400, None), ErrorKind::Other);
    }

    #[test]
    fn everything_else_other() {
        for code in [200, 401, 408, 409, 412, 500, 503] {
            assert_eq!(classify_status(code, None), ErrorKind::Other);
        }
    }

    #[test]
    fn classify_reads_error_fields() {
        let e = DocumentClientError::new(404, "lagging replica")
            .with_sub_status(sub_status_codes::READ_SESSION_NOT_AVAILABLE);
        assert_eq!(classify(&e), ErrorKind::ReadSessionNotAvailable);
    }
}
