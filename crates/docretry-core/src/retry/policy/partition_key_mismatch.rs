//! 400/PartitionKeyMismatch on create: refresh the cached schema and retry once.

use std::sync::Arc;
use std::time::Duration;

use crate::client::PartitionKeyDefinitionMap;
use crate::retry::error::DocumentClientError;

use super::RetryPolicy;

const MAX_RETRIES: u32 = 1;

/// Retries a document create once after refreshing the collection's cached
/// partition-key definition. A mismatch that survives the refresh is terminal.
pub struct PartitionKeyMismatchRetryPolicy {
    resource_path: String,
    definitions: Arc<dyn PartitionKeyDefinitionMap>,
    retries: u32,
}

impl PartitionKeyMismatchRetryPolicy {
    pub fn new(
        resource_path: impl Into<String>,
        definitions: Arc<dyn PartitionKeyDefinitionMap>,
    ) -> Self {
        Self {
            resource_path: resource_path.into(),
            definitions,
            retries: 0,
        }
    }

    pub fn resource_path(&self) -> &str {
        &self.resource_path
    }
}

impl RetryPolicy for PartitionKeyMismatchRetryPolicy {
    type Request = ();

    fn should_retry(&mut self, _error: &DocumentClientError, _request: &mut ()) -> bool {
        if self.retries >= MAX_RETRIES {
            return false;
        }
        self.definitions.refresh(&self.resource_path);
        self.retries += 1;
        true
    }

    fn retry_after(&self) -> Duration {
        Duration::ZERO
    }
}
