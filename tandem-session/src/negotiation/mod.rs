mod publisher_fsm;
mod subscriber_driver;

pub use publisher_fsm::*;
pub use subscriber_driver::*;
