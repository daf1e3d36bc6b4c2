//! Device audio path around the two connections.
//!
//! Capture, playback and the Opus codec are provided by the platform; this
//! module only moves fixed-size frames between them and the engine.

mod audio_io;
mod downlink;
mod uplink;

pub use audio_io::*;
pub use downlink::*;
pub use uplink::*;
