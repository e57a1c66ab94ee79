use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::{ClientError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:4000";
pub const DEFAULT_FEED_MAX_KM: u32 = 200;

/// Runtime configuration, read from `FLAME_*` environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every API path is resolved against.
    pub api_url: String,
    /// Realtime endpoint; derived from `api_url` when unset.
    pub realtime_url: Option<String>,
    pub store_path: PathBuf,
    pub feed_max_km: u32,
    pub feed_limit: Option<u32>,
    pub deck: DeckConfig,
}

/// Gesture and paging tunables for the swipe deck.
#[derive(Debug, Clone, Copy)]
pub struct DeckConfig {
    /// Minimum `|offset.x| * velocity.x` for a drag to count as a decision.
    pub swipe_threshold: f32,
    /// Minimum spacing between accepted wheel inputs.
    pub wheel_throttle: Duration,
    /// Wheel deltas smaller than this are treated as noise.
    pub wheel_min_delta: f32,
    /// Drag distance at which the card reaches full tilt.
    pub tilt_range: f32,
    pub max_tilt_degrees: f32,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: 500.0,
            wheel_throttle: Duration::from_millis(250),
            wheel_min_delta: 10.0,
            tilt_range: 400.0,
            max_tilt_degrees: 10.0,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        let api_url = env::var("FLAME_API_URL").unwrap_or_else(|_| {
            info!("FLAME_API_URL not set, using default: {DEFAULT_API_URL}");
            DEFAULT_API_URL.to_string()
        });

        let store_path = match env::var("FLAME_STORE_PATH") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_store_path(),
        };

        Ok(Self {
            api_url,
            realtime_url: env::var("FLAME_REALTIME_URL").ok(),
            store_path,
            feed_max_km: try_load("FLAME_FEED_MAX_KM")?.unwrap_or(DEFAULT_FEED_MAX_KM),
            feed_limit: try_load("FLAME_FEED_LIMIT")?,
            deck: DeckConfig::default(),
        })
    }

    /// Configuration pointing at `api_url` with everything else defaulted.
    pub fn for_api(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            realtime_url: None,
            store_path: default_store_path(),
            feed_max_km: DEFAULT_FEED_MAX_KM,
            feed_limit: None,
            deck: DeckConfig::default(),
        }
    }
}

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("flame")
        .join("session.db")
}

fn try_load<T: FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map(Some).map_err(|e| {
            warn!("Invalid {key} value: {e}");
            ClientError::Config(format!("invalid {key}: {e}"))
        }),
        Err(_) => Ok(None),
    }
}
