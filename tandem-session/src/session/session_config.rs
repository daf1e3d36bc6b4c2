use crate::engine::EngineConfig;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Period of the negotiation tick.
    pub tick_interval: Duration,
    /// How long the publisher may stay in one non-idle state. `None` waits
    /// forever.
    pub negotiation_timeout: Option<Duration>,
    /// Name sent with the add-track request.
    pub track_name: String,
    pub engine: EngineConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(15),
            negotiation_timeout: Some(Duration::from_secs(30)),
            track_name: "microphone".to_owned(),
            engine: EngineConfig::default(),
        }
    }
}
