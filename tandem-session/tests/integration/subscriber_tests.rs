use tandem_core::Role;
use tandem_session::SessionCommand;

use crate::integration::{default_test_session, init_tracing};
use crate::utils::{CANDIDATE, OFFER_DATA_ONLY, OFFER_WITH_AUDIO, SUBSCRIBER_LOCAL};

#[tokio::test]
async fn test_offer_and_candidate_produce_answer() {
    init_tracing();

    let mut t = default_test_session();

    t.session.handle_command(SessionCommand::RemoteOffer {
        sdp: OFFER_DATA_ONLY.to_string(),
    });
    t.session.handle_command(SessionCommand::IceCandidate {
        target: None,
        candidate: CANDIDATE.to_string(),
    });
    t.session.tick().await.unwrap();

    assert_eq!(t.subscriber.candidates(), vec![CANDIDATE.to_string()]);
    assert_eq!(t.subscriber.descriptions(), vec![OFFER_DATA_ONLY.to_string()]);

    let answers = t.signaling.answers().await;
    assert_eq!(answers.len(), 1, "one answer per offer");
    let answer = &answers[0];
    assert!(answer.contains("a=ice-ufrag:devufrag\r\n"));
    assert!(answer.contains("a=ice-pwd:devicepassworddevicepassword\r\n"));
    assert!(answer.contains("a=fingerprint:sha-256 AA:BB:CC:DD:EE:FF\r\n"));
    assert!(!answer.contains("m=audio"));

    let credentials = t.session.credentials().expect("credentials kept");
    assert_eq!(credentials.ice_ufrag(), "a=ice-ufrag:devufrag");
}

#[tokio::test]
async fn test_audio_offer_gets_audio_answer() {
    init_tracing();

    let mut t = default_test_session();

    t.session.handle_command(SessionCommand::RemoteOffer {
        sdp: OFFER_WITH_AUDIO.to_string(),
    });
    t.session.handle_command(SessionCommand::IceCandidate {
        target: Some(Role::Subscriber),
        candidate: CANDIDATE.to_string(),
    });
    t.session.tick().await.unwrap();

    let answers = t.signaling.answers().await;
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].matches("m=").count(), 2);
    assert_eq!(answers[0].matches("a=ice-ufrag:devufrag").count(), 2);
}

#[tokio::test]
async fn test_offer_held_until_candidate_arrives() {
    init_tracing();

    let mut t = default_test_session();

    t.session.handle_command(SessionCommand::RemoteOffer {
        sdp: OFFER_DATA_ONLY.to_string(),
    });
    for _ in 0..3 {
        t.session.tick().await.unwrap();
    }
    assert!(t.subscriber.descriptions().is_empty());
    assert!(t.signaling.answers().await.is_empty());

    t.session.handle_command(SessionCommand::IceCandidate {
        target: None,
        candidate: CANDIDATE.to_string(),
    });
    t.session.tick().await.unwrap();
    assert_eq!(t.signaling.answers().await.len(), 1);
}

#[tokio::test]
async fn test_local_description_without_credentials_sends_nothing() {
    init_tracing();

    let mut t = default_test_session();
    let broken = SUBSCRIBER_LOCAL.replace("a=fingerprint:sha-256 AA:BB:CC:DD:EE:FF\r\n", "");
    t.subscriber.set_local_description(&broken);

    t.session.handle_command(SessionCommand::RemoteOffer {
        sdp: OFFER_DATA_ONLY.to_string(),
    });
    t.session.handle_command(SessionCommand::IceCandidate {
        target: None,
        candidate: CANDIDATE.to_string(),
    });
    t.session.tick().await.unwrap();

    assert!(t.signaling.answers().await.is_empty());
    assert!(t.session.credentials().is_none());
}
