//! Retry orchestration for a partitioned, multi-region document service client.
//!
//! Callers hand an operation (a delegate) to [`retry::execute`] or
//! [`retry::execute_create_document`]; failures are classified by status and
//! sub-status, routed to a per-call retry policy, and re-issued until they
//! succeed or the policy gives up, at which point the original error is
//! returned.

pub mod client;
pub mod config;
pub mod logging;
pub mod retry;
