use tandem_core::IceServerConfig;

/// Settings shared by both peer connections.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub ice_servers: Vec<IceServerConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![IceServerConfig::from_url("stun:stun.l.google.com:19302")],
        }
    }
}
