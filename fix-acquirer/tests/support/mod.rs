use fix_acquirer::{FixRequest, FixService, FixServiceHandle, PositioningGateway};
use integration_test_utils::RecordingReplyTarget;
use std::sync::Arc;
use std::time::Duration;

pub(crate) const REPLY_TIMEOUT: Duration = Duration::from_secs(2);

pub(crate) fn make_service(name: &str, gateway: Arc<dyn PositioningGateway>) -> FixService {
    FixService::new(name, gateway).expect("fix service creation should succeed")
}

/// Waits until every command queued so far has been processed and returns the
/// number of in-flight requests.
pub(crate) async fn settle(handle: &FixServiceHandle) -> usize {
    handle
        .in_flight()
        .await
        .expect("fix service should be running")
}

pub(crate) fn submit(
    handle: &FixServiceHandle,
    request_id: i32,
    payload: &str,
) -> RecordingReplyTarget {
    let replies = RecordingReplyTarget::new();
    handle
        .acquire_fix(FixRequest::new(
            request_id,
            payload.as_bytes().to_vec(),
            Arc::new(replies.clone()),
        ))
        .expect("fix service should accept requests");
    replies
}

#[allow(dead_code)]
pub(crate) async fn wait_until<F>(mut condition: F)
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + REPLY_TIMEOUT;
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not met within {REPLY_TIMEOUT:?}"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
