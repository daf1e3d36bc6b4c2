use async_trait::async_trait;

/// Implemented by whatever carries signaling to the cloud service, so the
/// session can hand it outbound descriptions and requests.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Synthesized answer for the subscriber connection.
    async fn send_answer(&self, sdp: String);

    /// Local offer for the publisher connection.
    async fn send_offer(&self, sdp: String);

    /// Ask the cloud to accept the device's microphone track.
    async fn send_add_track(&self, name: String);
}
