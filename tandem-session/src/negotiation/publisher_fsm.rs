use crate::engine::PeerEngine;
use crate::signaling::SignalingStore;
use std::time::Duration;
use tandem_core::PublisherState;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Negotiation state machine for the publisher connection.
///
/// Owned by the session task. Other tasks only observe the state through
/// [`PublisherFsm::subscribe`].
pub struct PublisherFsm {
    state: PublisherState,
    entered_at: Instant,
    deadline: Option<Duration>,
    state_tx: watch::Sender<PublisherState>,
}

impl PublisherFsm {
    /// `deadline` bounds how long any non-idle state may last; `None`
    /// lets negotiation wait forever.
    pub fn new(deadline: Option<Duration>) -> Self {
        let (state_tx, _) = watch::channel(PublisherState::Idle);
        Self {
            state: PublisherState::Idle,
            entered_at: Instant::now(),
            deadline,
            state_tx,
        }
    }

    pub fn state(&self) -> PublisherState {
        self.state
    }

    pub fn subscribe(&self) -> watch::Receiver<PublisherState> {
        self.state_tx.subscribe()
    }

    /// Subscriber is up: start publishing. Returns `true` when the add-track
    /// request should go out.
    pub fn request_track_add(&mut self) -> bool {
        if self.state != PublisherState::Idle {
            debug!("Publisher already negotiating ({}), not re-arming", self.state);
            return false;
        }
        self.transition(PublisherState::RequestTrackAdd);
        true
    }

    /// Cloud accepted the track.
    pub fn track_published(&mut self) {
        if self.state != PublisherState::RequestTrackAdd {
            warn!("Track published while publisher is {}, ignoring", self.state);
            return;
        }
        self.transition(PublisherState::CreateOffer);
    }

    /// Engine reported the gathered local offer. Returns `true` when the
    /// offer should be sent.
    pub fn local_offer_ready(&mut self) -> bool {
        if !matches!(self.state, PublisherState::Idle | PublisherState::CreateOffer) {
            warn!("Local offer surfaced while publisher is {}, ignoring", self.state);
            return false;
        }
        self.transition(PublisherState::SendOffer);
        true
    }

    /// A remote answer is waiting in the store.
    pub fn answer_received(&mut self) {
        if self.state != PublisherState::SendOffer {
            warn!("Remote answer arrived while publisher is {}, ignoring", self.state);
            return;
        }
        self.transition(PublisherState::ApplyAnswer);
    }

    /// One tick of work for the current state.
    pub async fn drive(&mut self, store: &mut SignalingStore, publisher: &dyn PeerEngine) {
        match self.state {
            PublisherState::CreateOffer => match publisher.create_offer().await {
                Ok(()) => self.transition(PublisherState::Idle),
                Err(e) => error!("Failed to create publisher offer: {:?}", e),
            },
            PublisherState::ApplyAnswer => {
                let applied = store.apply_pending(publisher).await;
                if applied == 2 {
                    self.transition(PublisherState::Idle);
                } else {
                    debug!("Publisher answer not complete yet ({} of 2 applied)", applied);
                }
            }
            PublisherState::Idle | PublisherState::RequestTrackAdd | PublisherState::SendOffer => {}
        }
    }

    /// State whose deadline has passed, if any.
    pub fn expired(&self) -> Option<PublisherState> {
        let deadline = self.deadline?;
        if self.state == PublisherState::Idle || self.entered_at.elapsed() < deadline {
            return None;
        }
        Some(self.state)
    }

    /// Restart the deadline for the current state.
    pub fn rearm(&mut self) {
        self.entered_at = Instant::now();
    }

    /// Abandon the current cycle.
    pub fn reset(&mut self) {
        self.transition(PublisherState::Idle);
    }

    fn transition(&mut self, next: PublisherState) {
        info!("Publisher negotiation {} -> {}", self.state, next);
        self.state = next;
        self.entered_at = Instant::now();
        self.state_tx.send_replace(next);
    }
}
