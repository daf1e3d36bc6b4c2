use tandem_core::{Role, SignalMessage};

/// Inbound signaling delivered to the session task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Cloud offer for the subscriber connection.
    RemoteOffer { sdp: String },

    /// Cloud answer to the publisher's offer.
    RemoteAnswer { sdp: String },

    /// Remote ICE candidate. Without a target it goes to whichever
    /// connection is negotiating.
    IceCandidate {
        target: Option<Role>,
        candidate: String,
    },

    /// Cloud accepted the add-track request.
    TrackPublished,
}

impl SessionCommand {
    /// Map a wire message to a command. Messages the device only sends
    /// yield `None`.
    pub fn from_signal(message: SignalMessage) -> Option<Self> {
        match message {
            SignalMessage::Offer { sdp } => Some(Self::RemoteOffer { sdp }),
            SignalMessage::Answer { sdp } => Some(Self::RemoteAnswer { sdp }),
            SignalMessage::IceCandidate { candidate, target } => {
                Some(Self::IceCandidate { target, candidate })
            }
            SignalMessage::TrackPublished { .. } => Some(Self::TrackPublished),
            SignalMessage::AddTrack { .. } => None,
        }
    }
}
