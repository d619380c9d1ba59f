//! Regional endpoints and the endpoint-manager contract used by the
//! endpoint-discovery and session-read policies.

use anyhow::{Context, Result};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// Absolute URL of one regional service endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint(url::Url);

impl Endpoint {
    /// Parse and validate an endpoint URL.
    pub fn parse(s: &str) -> Result<Self> {
        let parsed = url::Url::parse(s).with_context(|| format!("invalid endpoint URL: {s}"))?;
        if parsed.host_str().is_none() {
            anyhow::bail!("endpoint URL missing host: {s}");
        }
        Ok(Self(parsed))
    }

    pub fn url(&self) -> &url::Url {
        &self.0
    }

    pub fn host(&self) -> &str {
        self.0.host_str().unwrap_or_default()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of the current region topology.
///
/// Implementations are shared process-wide and must be safe to read and
/// refresh from concurrent calls; the retry layer adds no locking.
pub trait EndpointManager: Send + Sync {
    /// Endpoint currently accepting writes.
    fn write_endpoint(&self) -> Endpoint;

    /// Endpoint reads go to when the request carries no override.
    fn read_endpoint(&self) -> Endpoint {
        self.read_endpoints()
            .into_iter()
            .next()
            .unwrap_or_else(|| self.write_endpoint())
    }

    /// All readable endpoints, most preferred first.
    fn read_endpoints(&self) -> Vec<Endpoint>;

    /// Re-learn the topology (called after a write was rejected by a region).
    fn refresh_endpoint_list(&self);
}

/// Write endpoint plus ordered read endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    pub write_endpoint: Endpoint,
    pub read_endpoints: Vec<Endpoint>,
}

type RefreshFn = Box<dyn Fn() -> Result<Topology> + Send + Sync>;

/// In-process [`EndpointManager`] holding a topology snapshot behind an `RwLock`.
///
/// `refresh_endpoint_list` swaps in the topology produced by the optional
/// refresh function; without one it only counts the refresh. A failed refresh
/// keeps the previous snapshot.
pub struct LocationCache {
    topology: RwLock<Topology>,
    refresh: Option<RefreshFn>,
    refreshes: AtomicU64,
}

impl LocationCache {
    pub fn new(topology: Topology) -> Self {
        Self {
            topology: RwLock::new(topology),
            refresh: None,
            refreshes: AtomicU64::new(0),
        }
    }

    /// Single-region account: the same endpoint serves reads and writes.
    pub fn single(endpoint: Endpoint) -> Self {
        Self::new(Topology {
            read_endpoints: vec![endpoint.clone()],
            write_endpoint: endpoint,
        })
    }

    pub fn with_refresh<F>(mut self, refresh: F) -> Self
    where
        F: Fn() -> Result<Topology> + Send + Sync + 'static,
    {
        self.refresh = Some(Box::new(refresh));
        self
    }

    /// Number of times `refresh_endpoint_list` has been called.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::Relaxed)
    }

    pub fn topology(&self) -> Topology {
        self.topology
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl fmt::Debug for LocationCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationCache")
            .field("topology", &self.topology())
            .field("refreshes", &self.refresh_count())
            .finish()
    }
}

impl EndpointManager for LocationCache {
    fn write_endpoint(&self) -> Endpoint {
        self.topology
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .write_endpoint
            .clone()
    }

    fn read_endpoints(&self) -> Vec<Endpoint> {
        self.topology
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .read_endpoints
            .clone()
    }

    fn refresh_endpoint_list(&self) {
        self.refreshes.fetch_add(1, Ordering::Relaxed);
        let Some(refresh) = &self.refresh else {
            return;
        };
        match refresh() {
            Ok(next) => {
                tracing::info!(
                    write = %next.write_endpoint,
                    reads = next.read_endpoints.len(),
                    "endpoint topology refreshed"
                );
                *self
                    .topology
                    .write()
                    .unwrap_or_else(|poisoned| poisoned.into_inner()) = next;
            }
            Err(e) => {
                tracing::warn!("endpoint topology refresh failed, keeping previous: {e:#}");
            }
        }
    }
}
