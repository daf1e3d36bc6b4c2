pub mod mock_audio;

pub use mock_audio::*;
pub use mock_engine::*;
pub use mock_signaling::*;
pub use mock_supervisor::*;
pub use sdp_fixtures::*;
