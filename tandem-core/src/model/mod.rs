mod connection;
mod publisher;
mod role;
mod signaling;

pub use connection::ConnectionState;
pub use publisher::PublisherState;
pub use role::Role;
pub use signaling::{IceServerConfig, SignalMessage};
