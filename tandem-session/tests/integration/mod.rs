pub mod deadline_tests;
pub mod publisher_tests;
pub mod subscriber_tests;

use tandem_core::Role;
use tandem_session::{Recovery, Session, SessionCommand, SessionConfig};
use tokio::sync::mpsc;
use tracing::Level;

use crate::utils::{MockEngine, MockHandle, MockSignalingOutput, RecordingSupervisor, SentSignal};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub struct TestSession {
    pub session: Session,
    pub cmd_tx: mpsc::Sender<SessionCommand>,
    pub subscriber: MockHandle,
    pub publisher: MockHandle,
    pub signaling: MockSignalingOutput,
    pub signal_rx: mpsc::UnboundedReceiver<SentSignal>,
    pub supervisor: RecordingSupervisor,
}

pub fn create_test_session(config: SessionConfig, decision: Recovery) -> TestSession {
    let (cmd_tx, cmd_rx) = mpsc::channel::<SessionCommand>(100);
    let (signaling, signal_rx) = MockSignalingOutput::new();
    let (subscriber_engine, subscriber) = MockEngine::new(Role::Subscriber);
    let (publisher_engine, publisher) = MockEngine::new(Role::Publisher);
    let supervisor = RecordingSupervisor::new(decision);

    let session = Session::new(
        config,
        Box::new(subscriber_engine),
        Box::new(publisher_engine),
        Box::new(supervisor.clone()),
        cmd_rx,
        Box::new(signaling.clone()),
    );

    TestSession {
        session,
        cmd_tx,
        subscriber,
        publisher,
        signaling,
        signal_rx,
        supervisor,
    }
}

pub fn default_test_session() -> TestSession {
    create_test_session(SessionConfig::default(), Recovery::Restart)
}
