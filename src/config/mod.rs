//! Configuration module - environment variable parsing

use std::env;
use std::str::FromStr;

use crate::track::TrackSpec;
use crate::util::time::DEFAULT_TICK_RATE;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Host loop ticks per second
    pub tick_rate: u32,

    /// Outer wall radius along x
    pub track_outer_x: f32,
    /// Outer wall radius along z
    pub track_outer_z: f32,
    /// Asphalt band width
    pub track_width: f32,
    /// Low-grip apron width inside the asphalt band
    pub track_apron: f32,

    /// Number of coins placed around the centerline
    pub coin_count: usize,
    /// Centerline progress the vehicle spawns at
    pub spawn_progress: f32,

    /// Drive the car with the built-in autopilot instead of stdin keys
    pub autopilot: bool,
    /// Stop the session automatically after this many seconds
    pub session_seconds: Option<u64>,
    /// Print every snapshot to stdout as a JSON line
    pub json_snapshots: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            tick_rate: DEFAULT_TICK_RATE,
            track_outer_x: 40.0,
            track_outer_z: 26.0,
            track_width: 8.0,
            track_apron: 2.0,
            coin_count: 12,
            spawn_progress: 0.75,
            autopilot: false,
            session_seconds: None,
            json_snapshots: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            tick_rate: parse_var("TICK_RATE")?.unwrap_or(defaults.tick_rate),

            track_outer_x: parse_var("TRACK_OUTER_X")?.unwrap_or(defaults.track_outer_x),
            track_outer_z: parse_var("TRACK_OUTER_Z")?.unwrap_or(defaults.track_outer_z),
            track_width: parse_var("TRACK_WIDTH")?.unwrap_or(defaults.track_width),
            track_apron: parse_var("TRACK_APRON")?.unwrap_or(defaults.track_apron),

            coin_count: parse_var("COIN_COUNT")?.unwrap_or(defaults.coin_count),
            spawn_progress: parse_var("SPAWN_PROGRESS")?.unwrap_or(defaults.spawn_progress),

            autopilot: parse_var("AUTOPILOT")?.unwrap_or(defaults.autopilot),
            session_seconds: parse_var("SESSION_SECONDS")?,
            json_snapshots: parse_var("JSON_SNAPSHOTS")?.unwrap_or(defaults.json_snapshots),
        })
    }

    /// Track specification described by this configuration (not yet validated)
    pub fn track_spec(&self) -> TrackSpec {
        TrackSpec {
            outer_x: self.track_outer_x,
            outer_z: self.track_outer_z,
            width: self.track_width,
            apron: self.track_apron,
        }
    }
}

/// Read an optional environment variable and parse it
fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
