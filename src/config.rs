//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Field-of-view parameters shared by every agent
    pub fov: FovConfig,
    /// Seed the fixed landmark agents at start-up
    pub seed_landmarks: bool,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
    /// Interval between keepalive pings on each WebSocket
    pub ping_interval: Duration,
}

/// Field-of-view configuration
///
/// Process-wide; there are no per-agent overrides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FovConfig {
    /// Total cone width in degrees
    pub max_fov_deg: f64,
    /// Maximum sensing distance in kilometers
    pub max_distance_km: f64,
}

impl Default for FovConfig {
    fn default() -> Self {
        Self {
            max_fov_deg: 45.0,
            max_distance_km: 1000.0,
        }
    }
}

/// Narrowest accepted cone width in degrees
pub const MIN_FOV_DEG: f64 = 0.1;

impl FovConfig {
    /// Validate the cone width and sensing distance
    /// Returns Ok(()) if valid, Err with message if invalid
    pub fn validate(&self) -> Result<(), String> {
        if !self.max_fov_deg.is_finite()
            || self.max_fov_deg < MIN_FOV_DEG
            || self.max_fov_deg > 360.0
        {
            return Err(format!(
                "max FOV must be in [{}, 360] degrees, got {}",
                MIN_FOV_DEG, self.max_fov_deg
            ));
        }
        if !self.max_distance_km.is_finite() || self.max_distance_km <= 0.0 {
            return Err(format!(
                "max distance must be a positive number of kilometers, got {}",
                self.max_distance_km
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let defaults = FovConfig::default();
        Self {
            server: ServerConfig {
                port: parse_var("PORT", 6969),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                ping_interval: Duration::from_secs(parse_var("WS_PING_INTERVAL_SECS", 30u64).max(1)),
            },
            fov: FovConfig {
                max_fov_deg: parse_var("FOV_MAX_DEGREES", defaults.max_fov_deg),
                max_distance_km: parse_var("FOV_MAX_DISTANCE_KM", defaults.max_distance_km),
            },
            seed_landmarks: parse_var("SEED_LANDMARKS", false),
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// Unparseable values fall back to the default so a typo cannot stop start-up
fn parse_var<T: FromStr + Copy + std::fmt::Debug>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(
                variable = name,
                value = %raw,
                default = ?default,
                "Ignoring unparseable environment variable"
            );
            default
        }),
        Err(_) => default,
    }
}
