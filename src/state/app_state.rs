// Application state shared by every connection and HTTP handler

use super::registry::AgentRegistry;
use crate::config::{Config, FovConfig};
use crate::fov::FovEngine;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_PING_INTERVAL: Duration = Duration::from_secs(30);

/// Main application state
/// Cheap to clone; every clone refers to the same registry
#[derive(Debug, Clone)]
pub struct AppState {
    /// Registry of all tracked agents
    pub registry: Arc<AgentRegistry>,
    /// FOV engine reading from `registry`
    pub engine: Arc<FovEngine>,
    /// Keepalive interval for WebSocket connections
    pub ping_interval: Duration,
}

impl AppState {
    /// Create state with an empty registry and the given FOV parameters
    pub fn new(fov: FovConfig) -> Self {
        let registry = Arc::new(AgentRegistry::new());
        let engine = Arc::new(FovEngine::new(Arc::clone(&registry), fov));
        Self {
            registry,
            engine,
            ping_interval: DEFAULT_PING_INTERVAL,
        }
    }

    /// Create state from the application configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            ping_interval: config.server.ping_interval,
            ..Self::new(config.fov)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_shares_registry() {
        let state = AppState::new(FovConfig::default());
        let (handle, _rx) = crate::session::ConnectionHandle::channel();
        state.registry.create("a".to_string(), handle).unwrap();

        assert!(Arc::ptr_eq(&state.registry, state.engine.registry()));
        assert_eq!(state.engine.registry().len(), 1);
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            server: crate::config::ServerConfig {
                port: 6969,
                host: "127.0.0.1".to_string(),
                ping_interval: Duration::from_secs(5),
            },
            fov: FovConfig {
                max_fov_deg: 90.0,
                max_distance_km: 10.0,
            },
            seed_landmarks: false,
        };

        let state = AppState::from_config(&config);
        assert_eq!(state.ping_interval, Duration::from_secs(5));
        assert_eq!(state.engine.config(), config.fov);
    }

    #[test]
    fn test_clone_shares_registry() {
        let state = AppState::new(FovConfig::default());
        let clone = state.clone();
        assert!(Arc::ptr_eq(&state.registry, &clone.registry));
    }
}
