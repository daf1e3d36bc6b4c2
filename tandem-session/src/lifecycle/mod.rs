mod connection_lifecycle;
mod supervisor;

pub use connection_lifecycle::*;
pub use supervisor::*;
