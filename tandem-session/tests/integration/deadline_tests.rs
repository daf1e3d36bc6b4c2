use std::time::Duration;

use tandem_core::{ConnectionState, PublisherState};
use tandem_session::{FailureCause, Recovery, SessionConfig, SessionError};

use crate::integration::{TestSession, create_test_session, init_tracing};

fn short_deadline(decision: Recovery) -> TestSession {
    let config = SessionConfig {
        negotiation_timeout: Some(Duration::from_secs(5)),
        ..SessionConfig::default()
    };
    create_test_session(config, decision)
}

#[tokio::test(start_paused = true)]
async fn test_unanswered_track_request_times_out() {
    init_tracing();

    let mut t = short_deadline(Recovery::Restart);
    t.subscriber.set_state(ConnectionState::Completed);
    t.session.tick().await.unwrap();

    tokio::time::advance(Duration::from_secs(4)).await;
    t.session.tick().await.unwrap();

    tokio::time::advance(Duration::from_secs(2)).await;
    let SessionError::Fatal { failure } = t.session.tick().await.unwrap_err();
    assert_eq!(
        failure.cause,
        FailureCause::NegotiationTimeout(PublisherState::RequestTrackAdd)
    );
}

#[tokio::test(start_paused = true)]
async fn test_continue_resends_track_request() {
    init_tracing();

    let mut t = short_deadline(Recovery::Continue);
    t.subscriber.set_state(ConnectionState::Completed);
    t.session.tick().await.unwrap();

    tokio::time::advance(Duration::from_secs(6)).await;
    t.session.tick().await.unwrap();
    assert_eq!(t.signaling.add_track_requests().await.len(), 2);

    // Deadline was re-armed.
    tokio::time::advance(Duration::from_secs(4)).await;
    t.session.tick().await.unwrap();
    assert_eq!(t.signaling.add_track_requests().await.len(), 2);
    assert_eq!(t.session.publisher_state(), PublisherState::RequestTrackAdd);
}

#[tokio::test(start_paused = true)]
async fn test_idle_publisher_never_times_out() {
    init_tracing();

    let mut t = short_deadline(Recovery::Restart);

    tokio::time::advance(Duration::from_secs(600)).await;
    t.session.tick().await.unwrap();
    assert!(t.supervisor.failures().is_empty());
}
