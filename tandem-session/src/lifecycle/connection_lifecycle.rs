use crate::lifecycle::supervisor::{Failure, FailureCause, Recovery, Supervisor};
use tandem_core::{ConnectionState, PublisherState, Role};
use tracing::info;

/// What the session must do after a connection state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    None,
    /// Subscriber is up, start publisher negotiation.
    ArmPublisher,
    /// Supervisor chose to keep going after this failure.
    Tolerate(Failure),
    /// Stop the session; the failure is reported to the caller.
    Restart(Failure),
}

/// Reacts to transport transitions of both connections and consults the
/// [`Supervisor`] whenever one of them is lost.
pub struct ConnectionLifecycle {
    supervisor: Box<dyn Supervisor>,
}

impl ConnectionLifecycle {
    pub fn new(supervisor: Box<dyn Supervisor>) -> Self {
        Self { supervisor }
    }

    pub fn on_state_change(&mut self, role: Role, state: ConnectionState) -> LifecycleAction {
        match (role, state) {
            (Role::Subscriber, ConnectionState::Completed) => {
                info!("Subscriber connected, arming publisher");
                LifecycleAction::ArmPublisher
            }
            (Role::Publisher, ConnectionState::Completed) => {
                info!("Publisher connected");
                LifecycleAction::None
            }
            (_, state) if state.is_fatal() => self.escalate(Failure {
                role,
                cause: FailureCause::Transport(state),
            }),
            _ => LifecycleAction::None,
        }
    }

    /// Publisher negotiation missed its deadline.
    pub fn on_negotiation_timeout(&mut self, state: PublisherState) -> LifecycleAction {
        self.escalate(Failure {
            role: Role::Publisher,
            cause: FailureCause::NegotiationTimeout(state),
        })
    }

    fn escalate(&mut self, failure: Failure) -> LifecycleAction {
        match self.supervisor.on_failure(&failure) {
            Recovery::Restart => LifecycleAction::Restart(failure),
            Recovery::Continue => LifecycleAction::Tolerate(failure),
        }
    }
}
