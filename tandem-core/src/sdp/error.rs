use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SdpError {
    #[error("session description has no `{0}` attribute")]
    MissingAttribute(&'static str),

    #[error("`{0}` attribute has an empty value")]
    EmptyAttribute(&'static str),

    #[error("`{0}` attribute spans more than one line")]
    MalformedAttribute(&'static str),

    #[error("answer cannot be rendered without ICE credentials and a fingerprint")]
    MissingCredentials,

    #[error("rendered answer needs {required} bytes but only {capacity} are available")]
    Truncated { required: usize, capacity: usize },
}
