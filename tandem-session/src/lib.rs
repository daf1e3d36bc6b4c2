pub mod audio;
pub mod engine;
pub mod lifecycle;
pub mod negotiation;
pub mod session;
pub mod signaling;

pub use engine::*;
pub use lifecycle::*;
pub use negotiation::*;
pub use session::*;
pub use signaling::*;
