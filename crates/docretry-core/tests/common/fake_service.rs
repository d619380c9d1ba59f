//! Scripted stand-in for the remote service used by the integration tests.
//!
//! A `FakeService` replays a fixed list of per-attempt outcomes and records
//! where each attempt was routed. Once the script runs out it keeps repeating
//! the last outcome.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use docretry::client::{
    ClientContext, Endpoint, EndpointManager, LocationCache, PartitionKeyDefinitionCache,
    ServiceRequest, Topology,
};
use docretry::config::ConnectionPolicy;
use docretry::retry::{DocumentClientError, SleepOutcome, Sleeper};

#[derive(Debug, Clone)]
pub enum Outcome {
    Ok(&'static str),
    Fail(DocumentClientError),
}

pub fn throttled() -> Outcome {
    Outcome::Fail(DocumentClientError::new(429, "request rate is large"))
}

pub fn throttled_with_hint(ms: u64) -> Outcome {
    Outcome::Fail(
        DocumentClientError::new(429, "request rate is large")
            .with_retry_after(Duration::from_millis(ms)),
    )
}

pub fn session_not_available() -> Outcome {
    Outcome::Fail(DocumentClientError::new(404, "read session not available").with_sub_status(1002))
}

pub fn write_forbidden() -> Outcome {
    Outcome::Fail(DocumentClientError::new(403, "write forbidden").with_sub_status(3))
}

pub fn partition_key_mismatch() -> Outcome {
    Outcome::Fail(DocumentClientError::new(400, "partition key mismatch").with_sub_status(1001))
}

pub struct FakeService {
    script: Vec<Outcome>,
    endpoints: Arc<dyn EndpointManager>,
    routed: Mutex<Vec<Endpoint>>,
}

impl FakeService {
    pub fn new(script: Vec<Outcome>, endpoints: Arc<dyn EndpointManager>) -> Self {
        assert!(!script.is_empty(), "script needs at least one outcome");
        Self {
            script,
            endpoints,
            routed: Mutex::new(Vec::new()),
        }
    }

    /// Perform one attempt: record the route, then return the scripted outcome.
    pub fn call(&self, request: &ServiceRequest) -> Result<&'static str, DocumentClientError> {
        let target = request.endpoint_override.clone().unwrap_or_else(|| {
            if request.is_read_only() {
                self.endpoints.read_endpoint()
            } else {
                self.endpoints.write_endpoint()
            }
        });
        let mut routed = self.routed.lock().unwrap();
        routed.push(target);
        let idx = (routed.len() - 1).min(self.script.len() - 1);
        match &self.script[idx] {
            Outcome::Ok(body) => Ok(body),
            Outcome::Fail(e) => Err(e.clone()),
        }
    }

    /// Create-path attempt: same script, no request.
    pub fn create(&self) -> Result<&'static str, DocumentClientError> {
        let endpoint = self.endpoints.write_endpoint();
        let mut routed = self.routed.lock().unwrap();
        routed.push(endpoint);
        let idx = (routed.len() - 1).min(self.script.len() - 1);
        match &self.script[idx] {
            Outcome::Ok(body) => Ok(body),
            Outcome::Fail(e) => Err(e.clone()),
        }
    }

    pub fn calls(&self) -> usize {
        self.routed.lock().unwrap().len()
    }

    pub fn routes(&self) -> Vec<String> {
        self.routed
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.host().to_string())
            .collect()
    }
}

/// Records requested delays without waiting.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, delay: Duration) -> SleepOutcome {
        self.delays.lock().unwrap().push(delay);
        SleepOutcome::Elapsed
    }
}

pub fn endpoint(host: &str) -> Endpoint {
    Endpoint::parse(&format!("https://{host}/")).unwrap()
}

/// Three-region account: writes go to `east`, reads prefer east, west, north.
pub fn three_region_locations() -> Arc<LocationCache> {
    Arc::new(LocationCache::new(Topology {
        write_endpoint: endpoint("east.example"),
        read_endpoints: vec![
            endpoint("east.example"),
            endpoint("west.example"),
            endpoint("north.example"),
        ],
    }))
}

pub struct Harness {
    pub context: ClientContext,
    pub locations: Arc<LocationCache>,
    pub partition_keys: Arc<PartitionKeyDefinitionCache>,
}

pub fn harness(policy: ConnectionPolicy, locations: Arc<LocationCache>) -> Harness {
    let partition_keys = Arc::new(PartitionKeyDefinitionCache::new());
    let context = ClientContext::new(policy, locations.clone(), partition_keys.clone());
    Harness {
        context,
        locations,
        partition_keys,
    }
}

pub fn throttle_policy(max_attempts: u32, max_wait_secs: u64) -> ConnectionPolicy {
    let mut policy = ConnectionPolicy::default();
    policy.retry_options.max_retry_attempts_on_throttled_requests = max_attempts;
    policy.retry_options.max_retry_wait_time_in_seconds = max_wait_secs;
    policy
}
