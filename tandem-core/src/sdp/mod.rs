//! Minimal SDP handling for the device's answerer role.
//!
//! The device never parses or generates full session descriptions. It pulls
//! three attribute lines out of the engine's local description and renders
//! a fixed-template answer around them.

mod answer;
mod credentials;
mod error;
mod scanner;

pub use answer::{ANSWER_CAPACITY, AnswerBuilder, SdpAnswer};
pub use credentials::{AnswerCredentials, FINGERPRINT, ICE_PWD, ICE_UFRAG};
pub use error::SdpError;
pub use scanner::SdpScanner;
