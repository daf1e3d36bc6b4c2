pub mod model;
pub mod sdp;

pub use model::{ConnectionState, IceServerConfig, PublisherState, Role, SignalMessage};
pub use sdp::{AnswerCredentials, SdpAnswer, SdpError, SdpScanner};
