use bytes::Bytes;
use tandem_core::ConnectionState;

/// Things an engine reports back while it is being advanced.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Local ICE gathering finished. Carries the complete local description,
    /// candidates included, since the engine does not trickle.
    LocalDescription(String),

    /// The connection moved to a new transport state.
    StateChanged(ConnectionState),

    /// One encoded Opus frame from the remote audio track.
    AudioFrame(Bytes),

    /// A message on the subscriber's data channel.
    DataMessage(Bytes),
}
