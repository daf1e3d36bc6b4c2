use std::fmt;
use tandem_core::{ConnectionState, PublisherState, Role};
use tracing::{error, warn};

/// Why a connection is considered lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    /// Transport reached a terminal state.
    Transport(ConnectionState),
    /// Publisher negotiation sat in one state past its deadline.
    NegotiationTimeout(PublisherState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Failure {
    pub role: Role,
    pub cause: FailureCause,
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::Transport(state) => write!(f, "transport {}", state),
            FailureCause::NegotiationTimeout(state) => {
                write!(f, "negotiation stuck in {}", state)
            }
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} connection: {}", self.role, self.cause)
    }
}

/// What the session does about a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Stop the session so the process can be restarted.
    Restart,
    /// Keep the session. A lost publisher restarts its negotiation; a lost
    /// subscriber waits for the cloud to send a new offer.
    Continue,
}

/// Recovery policy for fatal connection events.
pub trait Supervisor: Send {
    fn on_failure(&mut self, failure: &Failure) -> Recovery;
}

/// Every failure ends the session.
#[derive(Debug, Default, Clone, Copy)]
pub struct RestartOnFailure;

impl Supervisor for RestartOnFailure {
    fn on_failure(&mut self, failure: &Failure) -> Recovery {
        error!("Fatal failure on {}, restarting", failure);
        Recovery::Restart
    }
}

/// Tolerate a fixed number of failures, then restart. Meant for transient
/// `Disconnected` states: a connection that is `Closed` or `Failed` for good
/// will keep failing negotiation until the retries run out.
#[derive(Debug, Clone, Copy)]
pub struct RetryThenRestart {
    retries_left: u32,
}

impl RetryThenRestart {
    pub fn new(retries: u32) -> Self {
        Self {
            retries_left: retries,
        }
    }

    pub fn retries_left(&self) -> u32 {
        self.retries_left
    }
}

impl Supervisor for RetryThenRestart {
    fn on_failure(&mut self, failure: &Failure) -> Recovery {
        if self.retries_left == 0 {
            error!("Fatal failure on {}, retries exhausted, restarting", failure);
            return Recovery::Restart;
        }
        self.retries_left -= 1;
        warn!(
            "Failure on {}, continuing ({} retries left)",
            failure, self.retries_left
        );
        Recovery::Continue
    }
}
