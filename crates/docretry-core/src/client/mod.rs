//! Client-side collaborators the retry policies depend on.
//!
//! The retry layer only sees these through narrow contracts: the connection
//! policy (retry option values), an [`EndpointManager`] for the region
//! topology, and a [`PartitionKeyDefinitionMap`] for collection schemas. Both
//! shared caches are process-wide and carry their own locking.

mod endpoint;
mod partition_key;
mod request;

use std::fmt;
use std::sync::Arc;

use crate::config::ConnectionPolicy;

pub use endpoint::{Endpoint, EndpointManager, LocationCache, Topology};
pub use partition_key::{
    PartitionKeyDefinition, PartitionKeyDefinitionCache, PartitionKeyDefinitionMap, PartitionKind,
};
pub use request::{OperationType, ResourceType, ServiceRequest, SESSION_TOKEN_HEADER};

/// Everything an orchestrator needs from the surrounding client.
#[derive(Clone)]
pub struct ClientContext {
    connection_policy: ConnectionPolicy,
    endpoint_manager: Arc<dyn EndpointManager>,
    partition_key_definitions: Arc<dyn PartitionKeyDefinitionMap>,
}

impl ClientContext {
    pub fn new(
        connection_policy: ConnectionPolicy,
        endpoint_manager: Arc<dyn EndpointManager>,
        partition_key_definitions: Arc<dyn PartitionKeyDefinitionMap>,
    ) -> Self {
        Self {
            connection_policy,
            endpoint_manager,
            partition_key_definitions,
        }
    }

    pub fn connection_policy(&self) -> &ConnectionPolicy {
        &self.connection_policy
    }

    pub fn endpoint_manager(&self) -> &Arc<dyn EndpointManager> {
        &self.endpoint_manager
    }

    pub fn partition_key_definitions(&self) -> &Arc<dyn PartitionKeyDefinitionMap> {
        &self.partition_key_definitions
    }
}

impl fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientContext")
            .field("connection_policy", &self.connection_policy)
            .finish_non_exhaustive()
    }
}
