use crate::engine::engine_event::EngineEvent;
use anyhow::Result;
use async_trait::async_trait;
use tandem_core::{ConnectionState, Role};

/// Boundary to the WebRTC engine that owns one peer connection.
///
/// The session never looks inside the connection. It feeds signaling values
/// in, asks for an offer when the publisher needs one, and collects events
/// by calling [`PeerEngine::advance`] once per tick.
#[async_trait]
pub trait PeerEngine: Send + Sync {
    fn role(&self) -> Role;

    /// Last transport state observed by the engine.
    fn state(&self) -> ConnectionState;

    async fn add_ice_candidate(&self, candidate: &str) -> Result<()>;

    /// Offer for the subscriber, answer for the publisher.
    async fn set_remote_description(&self, sdp: &str) -> Result<()>;

    /// Start local offer creation. The offer is reported later as
    /// [`EngineEvent::LocalDescription`].
    async fn create_offer(&self) -> Result<()>;

    async fn send_audio(&self, frame: &[u8]) -> Result<()>;

    /// Per-tick service call. Must run for both connections every tick.
    async fn advance(&mut self) -> Vec<EngineEvent>;

    async fn close(&self) -> Result<()>;
}
