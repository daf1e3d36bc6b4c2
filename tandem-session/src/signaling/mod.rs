mod signaling_output;
mod signaling_store;

pub use signaling_output::*;
pub use signaling_store::*;
