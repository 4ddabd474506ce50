use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub realtime: RealtimeConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ApiConfig {
    /// Backend port; the host is taken from the page location
    pub port: u16,
    pub base_path: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RealtimeConfig {
    /// Raw WebSocket transport of the STOMP endpoint
    pub endpoint: String,
    pub reconnect_initial_ms: u64,
    pub reconnect_max_ms: u64,
}

impl RealtimeConfig {
    pub fn reconnect_initial(&self) -> Duration {
        Duration::from_millis(self.reconnect_initial_ms)
    }

    pub fn reconnect_max(&self) -> Duration {
        Duration::from_millis(self.reconnect_max_ms.max(self.reconnect_initial_ms))
    }
}

/// Default configuration embedded in the bundle
const DEFAULT_CONFIG: &str = r#"
[api]
port = 8090
base_path = "/api/v1"

[realtime]
endpoint = "/api/v1/ws/websocket"
reconnect_initial_ms = 1000
reconnect_max_ms = 30000
"#;

/// Parse a configuration document
pub fn parse_config(contents: &str) -> Result<ClientConfig, toml::de::Error> {
    toml::from_str(contents)
}

/// Load the embedded configuration, falling back to built-in values if the
/// document is somehow broken.
pub fn load_config() -> ClientConfig {
    match parse_config(DEFAULT_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            log::error!("[config] embedded config is invalid: {}", e);
            ClientConfig {
                api: ApiConfig {
                    port: 8090,
                    base_path: "/api/v1".to_string(),
                },
                realtime: RealtimeConfig {
                    endpoint: "/api/v1/ws/websocket".to_string(),
                    reconnect_initial_ms: 1000,
                    reconnect_max_ms: 30000,
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.api.port, 8090);
        assert_eq!(config.api.base_path, "/api/v1");
        assert_eq!(config.realtime.reconnect_initial(), Duration::from_secs(1));
        assert_eq!(load_config(), config);
    }

    #[test]
    fn test_reconnect_max_never_below_initial() {
        let realtime = RealtimeConfig {
            endpoint: "/ws".into(),
            reconnect_initial_ms: 5000,
            reconnect_max_ms: 100,
        };
        assert_eq!(realtime.reconnect_max(), Duration::from_millis(5000));
    }
}
