use crate::engine::PeerEngine;
use tandem_core::Role;
use tracing::{debug, warn};

/// Values waiting to be applied to one connection.
#[derive(Debug, Default)]
struct PendingSignals {
    ice_candidate: Option<String>,
    remote_description: Option<String>,
}

/// Transient signaling values between the ingress and the two connections.
///
/// One slot per category and connection. A value that arrives before the
/// previous one was consumed replaces it; the dropped value is logged.
#[derive(Debug, Default)]
pub struct SignalingStore {
    subscriber: PendingSignals,
    publisher: PendingSignals,
}

impl SignalingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remote offer for the subscriber connection.
    pub fn set_offer(&mut self, sdp: String) {
        replace_slot(&mut self.subscriber.remote_description, sdp, "subscriber remote offer");
    }

    /// Remote answer for the publisher connection.
    pub fn set_answer(&mut self, sdp: String) {
        replace_slot(&mut self.publisher.remote_description, sdp, "publisher remote answer");
    }

    pub fn set_ice_candidate(&mut self, role: Role, candidate: String) {
        let slot = &mut self.slots_mut(role).ice_candidate;
        let label = match role {
            Role::Subscriber => "subscriber ICE candidate",
            Role::Publisher => "publisher ICE candidate",
        };
        replace_slot(slot, candidate, label);
    }

    pub fn has_pending_description(&self, role: Role) -> bool {
        self.slots(role).remote_description.is_some()
    }

    pub fn has_pending_candidate(&self, role: Role) -> bool {
        self.slots(role).ice_candidate.is_some()
    }

    /// Feed whatever is pending for the connection's role into it and return
    /// how many values were applied (0, 1 or 2).
    ///
    /// The engine does not trickle: until the connection is completed, a
    /// description is held back until its candidate is available. A
    /// candidate is never added to a completed connection.
    pub async fn apply_pending(&mut self, connection: &dyn PeerEngine) -> usize {
        let role = connection.role();
        let completed = connection.state().is_completed();
        let slots = self.slots_mut(role);

        if !completed && slots.ice_candidate.is_none() {
            return 0;
        }

        let mut applied = 0;

        if !completed {
            if let Some(candidate) = slots.ice_candidate.take() {
                match connection.add_ice_candidate(&candidate).await {
                    Ok(()) => applied += 1,
                    Err(e) => warn!("Failed to add ICE candidate to {}: {:?}", role, e),
                }
            }
        }

        if let Some(sdp) = slots.remote_description.take() {
            match connection.set_remote_description(&sdp).await {
                Ok(()) => applied += 1,
                Err(e) => warn!("Failed to set remote description on {}: {:?}", role, e),
            }
        }

        if applied > 0 {
            debug!("Applied {} signaling value(s) to {}", applied, role);
        }
        applied
    }

    fn slots(&self, role: Role) -> &PendingSignals {
        match role {
            Role::Subscriber => &self.subscriber,
            Role::Publisher => &self.publisher,
        }
    }

    fn slots_mut(&mut self, role: Role) -> &mut PendingSignals {
        match role {
            Role::Subscriber => &mut self.subscriber,
            Role::Publisher => &mut self.publisher,
        }
    }
}

fn replace_slot(slot: &mut Option<String>, value: String, label: &str) {
    if let Some(dropped) = slot.replace(value) {
        warn!(
            "Overwriting unconsumed {} ({} bytes dropped)",
            label,
            dropped.len()
        );
    }
}
