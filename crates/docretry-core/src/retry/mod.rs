//! Retry orchestration.
//!
//! This module classifies service errors by `(status, sub-status)`, picks the
//! stateful policy for that class, and re-issues the caller's delegate until
//! it succeeds or the policy runs out of budget. Two entry points exist: the
//! generic request path ([`execute`]) and the document-create path
//! ([`execute_create_document`]).

mod classify;
mod error;
pub mod policy;
mod run;
mod sleep;

pub use classify::{classify, classify_status, ErrorKind};
pub use error::{status_codes, sub_status_codes, DocumentClientError};
pub use policy::RetryPolicy;
pub use run::{
    execute, execute_create_document, RetryCreateDocumentDelegate, RetryExecutor,
    RetryRequestDelegate,
};
pub use sleep::{InterruptibleSleeper, SleepOutcome, Sleeper, ThreadSleeper};
