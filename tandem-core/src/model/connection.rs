use serde::{Deserialize, Serialize};
use std::fmt;

/// Transport state of a peer connection as reported by the engine.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq)]
pub enum ConnectionState {
    New,
    Checking,
    /// ICE connected, secure transport not yet established.
    Connected,
    /// Fully usable. Candidates must never be added past this point.
    Completed,
    Disconnected,
    Closed,
    Failed,
}

impl ConnectionState {
    pub fn is_completed(self) -> bool {
        self == ConnectionState::Completed
    }

    /// States the device cannot recover from without outside help.
    pub fn is_fatal(self) -> bool {
        matches!(
            self,
            ConnectionState::Disconnected | ConnectionState::Closed | ConnectionState::Failed
        )
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::New => "new",
            ConnectionState::Checking => "checking",
            ConnectionState::Connected => "connected",
            ConnectionState::Completed => "completed",
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Closed => "closed",
            ConnectionState::Failed => "failed",
        };
        f.write_str(name)
    }
}
