use tandem_core::{ConnectionState, PublisherState, Role};
use tandem_session::{EngineEvent, SessionCommand};

use crate::integration::{TestSession, default_test_session, init_tracing};
use crate::utils::{CANDIDATE, OTHER_CANDIDATE, PUBLISHER_OFFER, REMOTE_ANSWER};

async fn arm_publisher(t: &mut TestSession) {
    t.subscriber.set_state(ConnectionState::Completed);
    t.session.tick().await.unwrap();
}

#[tokio::test]
async fn test_subscriber_completed_arms_publisher_in_same_tick() {
    init_tracing();

    let mut t = default_test_session();
    assert_eq!(t.session.publisher_state(), PublisherState::Idle);

    arm_publisher(&mut t).await;

    assert_eq!(t.session.publisher_state(), PublisherState::RequestTrackAdd);
    assert_eq!(
        t.signaling.add_track_requests().await,
        vec!["microphone".to_string()]
    );
}

#[tokio::test]
async fn test_rearming_while_negotiating_is_ignored() {
    init_tracing();

    let mut t = default_test_session();
    arm_publisher(&mut t).await;
    arm_publisher(&mut t).await;

    assert_eq!(t.session.publisher_state(), PublisherState::RequestTrackAdd);
    assert_eq!(t.signaling.add_track_requests().await.len(), 1);
}

#[tokio::test]
async fn test_full_publisher_cycle() {
    init_tracing();

    let mut t = default_test_session();
    arm_publisher(&mut t).await;

    t.session.handle_command(SessionCommand::TrackPublished);
    assert_eq!(t.session.publisher_state(), PublisherState::CreateOffer);

    // Offer creation and the gathered offer both land in this tick.
    t.session.tick().await.unwrap();
    assert_eq!(t.publisher.offer_attempts(), 1);
    assert_eq!(t.session.publisher_state(), PublisherState::SendOffer);
    assert_eq!(t.signaling.offers().await, vec![PUBLISHER_OFFER.to_string()]);

    t.session.handle_command(SessionCommand::RemoteAnswer {
        sdp: REMOTE_ANSWER.to_string(),
    });
    assert_eq!(t.session.publisher_state(), PublisherState::ApplyAnswer);

    // Answer alone is not enough.
    t.session.tick().await.unwrap();
    assert_eq!(t.session.publisher_state(), PublisherState::ApplyAnswer);
    assert!(t.publisher.descriptions().is_empty());

    t.session.handle_command(SessionCommand::IceCandidate {
        target: None,
        candidate: CANDIDATE.to_string(),
    });
    t.session.tick().await.unwrap();

    assert_eq!(t.session.publisher_state(), PublisherState::Idle);
    assert_eq!(t.publisher.candidates(), vec![CANDIDATE.to_string()]);
    assert_eq!(t.publisher.descriptions(), vec![REMOTE_ANSWER.to_string()]);
}

#[tokio::test]
async fn test_partial_apply_keeps_waiting() {
    init_tracing();

    let mut t = default_test_session();
    arm_publisher(&mut t).await;
    t.session.handle_command(SessionCommand::TrackPublished);
    t.session.tick().await.unwrap();

    t.publisher.reject_candidates(true);
    t.session.handle_command(SessionCommand::RemoteAnswer {
        sdp: REMOTE_ANSWER.to_string(),
    });
    t.session.handle_command(SessionCommand::IceCandidate {
        target: Some(Role::Publisher),
        candidate: CANDIDATE.to_string(),
    });
    t.session.tick().await.unwrap();

    assert_eq!(t.session.publisher_state(), PublisherState::ApplyAnswer);
}

#[tokio::test]
async fn test_failed_offer_is_retried() {
    init_tracing();

    let mut t = default_test_session();
    arm_publisher(&mut t).await;
    t.session.handle_command(SessionCommand::TrackPublished);

    t.publisher.fail_offers(true);
    t.session.tick().await.unwrap();
    t.session.tick().await.unwrap();
    assert_eq!(t.session.publisher_state(), PublisherState::CreateOffer);
    assert_eq!(t.publisher.offer_attempts(), 2);
    assert!(t.signaling.offers().await.is_empty());

    t.publisher.fail_offers(false);
    t.session.tick().await.unwrap();
    assert_eq!(t.session.publisher_state(), PublisherState::SendOffer);
}

#[tokio::test]
async fn test_untargeted_candidate_follows_negotiating_connection() {
    init_tracing();

    let mut t = default_test_session();

    t.session.handle_command(SessionCommand::IceCandidate {
        target: None,
        candidate: CANDIDATE.to_string(),
    });
    assert!(t.session.store().has_pending_candidate(Role::Subscriber));
    assert!(!t.session.store().has_pending_candidate(Role::Publisher));

    arm_publisher(&mut t).await;

    t.session.handle_command(SessionCommand::IceCandidate {
        target: None,
        candidate: OTHER_CANDIDATE.to_string(),
    });
    assert!(t.session.store().has_pending_candidate(Role::Publisher));
}

#[tokio::test]
async fn test_stray_offer_keeps_answer_in_flight() {
    init_tracing();

    let mut t = default_test_session();
    arm_publisher(&mut t).await;
    t.session.handle_command(SessionCommand::TrackPublished);
    t.session.tick().await.unwrap();
    t.session.handle_command(SessionCommand::RemoteAnswer {
        sdp: REMOTE_ANSWER.to_string(),
    });

    t.publisher
        .push_event(EngineEvent::LocalDescription(PUBLISHER_OFFER.to_string()));
    t.session.tick().await.unwrap();

    assert_eq!(t.session.publisher_state(), PublisherState::ApplyAnswer);
    assert_eq!(t.signaling.offers().await.len(), 1);
    assert!(t.session.store().has_pending_description(Role::Publisher));
}
