//! Integration test: concurrent calls sharing one client context keep independent retry state.

mod common;

use common::fake_service::{
    harness, three_region_locations, throttle_policy, throttled_with_hint, FakeService, Outcome,
    RecordingSleeper,
};
use docretry::client::{OperationType, ResourceType, ServiceRequest};
use docretry::retry::RetryExecutor;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_throttled_calls_count_their_own_attempts() {
    const CALLS: usize = 24;
    let h = harness(throttle_policy(5, 30), three_region_locations());

    let mut handles = Vec::with_capacity(CALLS);
    for i in 0..CALLS {
        let context = h.context.clone();
        let locations = h.locations.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let failures = i % 5;
            let mut script = vec![throttled_with_hint(1 + i as u64); failures];
            script.push(Outcome::Ok("doc"));
            let service = FakeService::new(script, locations);
            let exec = RetryExecutor::with_sleeper(RecordingSleeper::default());
            let mut req = ServiceRequest::new(
                OperationType::Read,
                ResourceType::Document,
                format!("dbs/db1/colls/orders/docs/{i}"),
            );

            let out = exec.execute(|r: &ServiceRequest| service.call(r), &context, &mut req);

            (i, failures, out.is_ok(), service.calls(), exec.sleeper().delays())
        }));
    }

    for handle in handles {
        let (i, failures, ok, calls, delays) = handle.await.expect("task panicked");
        assert!(ok, "call {i} should succeed");
        assert_eq!(calls, failures + 1, "call {i} saw someone else's attempts");
        assert_eq!(delays.len(), failures, "call {i}");
        // Each call only ever waited for its own hint.
        assert!(delays
            .iter()
            .all(|d| d.as_millis() as usize == 1 + i));
    }
}

#[test]
fn scoped_threads_exhaust_independently() {
    let h = harness(throttle_policy(2, 30), three_region_locations());

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let h = &h;
                s.spawn(move || {
                    let service =
                        FakeService::new(vec![throttled_with_hint(1)], h.locations.clone());
                    let exec = RetryExecutor::with_sleeper(RecordingSleeper::default());
                    let mut req = ServiceRequest::new(
                        OperationType::Query,
                        ResourceType::Document,
                        format!("dbs/db1/colls/c{i}"),
                    );
                    let out =
                        exec.execute(|r: &ServiceRequest| service.call(r), &h.context, &mut req);
                    (out.is_err(), service.calls())
                })
            })
            .collect();
        for handle in handles {
            let (failed, calls) = handle.join().unwrap();
            assert!(failed);
            assert_eq!(calls, 3);
        }
    });
}
