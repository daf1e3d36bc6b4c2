use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two device connections a value or event belongs to.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Inbound connection: commands and audio from the cloud service.
    Subscriber,
    /// Outbound connection: microphone audio to the cloud service.
    Publisher,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Subscriber => write!(f, "subscriber"),
            Role::Publisher => write!(f, "publisher"),
        }
    }
}
