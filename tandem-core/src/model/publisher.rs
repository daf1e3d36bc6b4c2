use serde::{Deserialize, Serialize};
use std::fmt;

/// Negotiation progress of the publisher connection.
///
/// The discriminants are the values the device reports over its debug
/// channel, so they are fixed.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq, Default)]
#[repr(u8)]
pub enum PublisherState {
    /// Nothing to do. Entered at startup and after each completed cycle.
    #[default]
    Idle = 0,
    /// Waiting for the cloud to acknowledge the add-track request.
    RequestTrackAdd = 1,
    /// The next tick asks the engine for a local offer.
    CreateOffer = 2,
    /// Local offer handed to signaling, waiting for the remote answer.
    SendOffer = 3,
    /// Remote answer delivered, waiting until answer and candidate both apply.
    ApplyAnswer = 4,
}

impl PublisherState {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for PublisherState {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PublisherState::Idle),
            1 => Ok(PublisherState::RequestTrackAdd),
            2 => Ok(PublisherState::CreateOffer),
            3 => Ok(PublisherState::SendOffer),
            4 => Ok(PublisherState::ApplyAnswer),
            other => Err(other),
        }
    }
}

impl fmt::Display for PublisherState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PublisherState::Idle => "idle",
            PublisherState::RequestTrackAdd => "request-track-add",
            PublisherState::CreateOffer => "create-offer",
            PublisherState::SendOffer => "send-offer",
            PublisherState::ApplyAnswer => "apply-answer",
        };
        write!(f, "{}({})", name, self.as_u8())
    }
}
