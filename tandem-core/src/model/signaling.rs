use crate::model::role::Role;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            username: None,
            credential: None,
        }
    }
}

/// Messages exchanged with the cloud signaling service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "d")]
pub enum SignalMessage {
    /// Remote offer for the subscriber connection.
    Offer { sdp: String },
    /// Remote answer for the publisher connection (inbound), or the
    /// synthesized subscriber answer (outbound).
    Answer { sdp: String },
    /// Non-trickle candidate. Without a target it belongs to whichever
    /// connection is currently negotiating.
    IceCandidate {
        candidate: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<Role>,
    },
    /// Device asks the cloud to accept a new microphone track.
    AddTrack { name: String },
    /// Cloud accepted the track; the publisher may now create its offer.
    TrackPublished { name: String },
}
