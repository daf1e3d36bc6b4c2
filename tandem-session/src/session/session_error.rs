use crate::lifecycle::Failure;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The supervisor gave up on a connection.
    #[error("session stopped after fatal failure: {failure}")]
    Fatal { failure: Failure },
}
