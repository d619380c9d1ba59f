//! The request value an orchestrator re-issues across retries.

use std::collections::BTreeMap;

use super::endpoint::Endpoint;

/// Header carrying the session token a read must observe.
pub const SESSION_TOKEN_HEADER: &str = "x-ms-session-token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    Create,
    Read,
    ReadFeed,
    Replace,
    Upsert,
    Delete,
    Query,
    ExecuteJavaScript,
}

impl OperationType {
    /// Whether the operation must be served by the write region.
    pub fn is_write(self) -> bool {
        matches!(
            self,
            OperationType::Create
                | OperationType::Replace
                | OperationType::Upsert
                | OperationType::Delete
                | OperationType::ExecuteJavaScript
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Database,
    DocumentCollection,
    Document,
    Attachment,
    StoredProcedure,
    Trigger,
    UserDefinedFunction,
    Offer,
}

/// One service call.
///
/// The orchestrator borrows the request mutably for the whole call and hands
/// the same value to every attempt. Of the retry policies, only Session-Read
/// writes to it, and only `endpoint_override`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRequest {
    pub operation: OperationType,
    pub resource_type: ResourceType,
    /// Path to the addressed resource, e.g. `dbs/db1/colls/c1/docs/d1`.
    pub resource_path: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Vec<u8>>,
    /// When set, the transport sends the request here instead of the endpoint
    /// the endpoint manager would pick.
    pub endpoint_override: Option<Endpoint>,
}

impl ServiceRequest {
    pub fn new(
        operation: OperationType,
        resource_type: ResourceType,
        resource_path: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            resource_type,
            resource_path: resource_path.into(),
            headers: BTreeMap::new(),
            body: None,
            endpoint_override: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn session_token(&self) -> Option<&str> {
        self.headers.get(SESSION_TOKEN_HEADER).map(String::as_str)
    }

    pub fn is_read_only(&self) -> bool {
        !self.operation.is_write()
    }
}
