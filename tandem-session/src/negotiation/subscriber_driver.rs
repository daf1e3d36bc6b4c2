use crate::engine::PeerEngine;
use crate::signaling::SignalingStore;
use tandem_core::sdp::ANSWER_CAPACITY;
use tandem_core::{AnswerCredentials, SdpAnswer, SdpError, SdpScanner};
use tracing::{debug, info};

/// Feeds the subscriber connection and turns its local description into the
/// answer the cloud expects.
#[derive(Debug, Default)]
pub struct SubscriberDriver {
    credentials: Option<AnswerCredentials>,
    offer_has_audio: bool,
}

impl SubscriberDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credentials(&self) -> Option<&AnswerCredentials> {
        self.credentials.as_ref()
    }

    /// Remember what the remote offer asks for before it is queued.
    pub fn note_offer(&mut self, sdp: &str) {
        self.offer_has_audio = SdpScanner::new(sdp).has_media("audio");
        debug!("Subscriber offer received (audio: {})", self.offer_has_audio);
    }

    /// Apply pending candidate and offer to the subscriber.
    pub async fn drain(&self, store: &mut SignalingStore, subscriber: &dyn PeerEngine) -> usize {
        store.apply_pending(subscriber).await
    }

    /// Extract credentials from the subscriber's local description and
    /// render the answer.
    pub fn answer_for(&mut self, local_description: &str) -> Result<String, SdpError> {
        let credentials = AnswerCredentials::extract(local_description)?;
        let answer = SdpAnswer::builder()
            .credentials(&credentials)
            .include_audio(self.offer_has_audio)
            .build()?
            .render::<ANSWER_CAPACITY>()?;

        info!(
            "Subscriber answer synthesized ({} bytes, audio: {})",
            answer.len(),
            self.offer_has_audio
        );
        self.credentials = Some(credentials);
        Ok(answer.as_str().to_owned())
    }
}
