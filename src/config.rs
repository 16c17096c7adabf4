//! Timer configuration passed in from the page as JSON.

use serde::Deserialize;

use crate::countdown::ExpiryPolicy;
use crate::error::{PageError, Result};

pub const DEFAULT_TICK_INTERVAL_MS: u32 = 1000;

/// Countdown settings plus the identifiers of the page elements it drives.
/// Defaults match the markup rendered by the quiz server.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TimerConfig {
    /// Written into the source element before the first tick; `None` keeps the page value.
    pub initial_seconds: Option<i64>,
    pub tick_interval_ms: u32,
    pub expiry: ExpiryPolicy,
    /// Name of the element whose `value` attribute holds the remaining seconds.
    pub source_name: String,
    /// Shared name of the hidden inputs mirroring the remaining seconds.
    pub field_name: String,
    /// Id of the container showing the formatted time.
    pub display_id: String,
    /// Name of the form submitted on expiry.
    pub form_name: String,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            initial_seconds: None,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            expiry: ExpiryPolicy::Halt,
            source_name: "rts".to_string(),
            field_name: "secs_left".to_string(),
            display_id: "time_left".to_string(),
            form_name: "timeout".to_string(),
        }
    }
}

impl TimerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_start(initial_seconds: Option<i64>, tick_interval_ms: u32) -> Result<Self> {
        let config = Self { initial_seconds, tick_interval_ms, ..Self::default() };
        config.validate()?;
        Ok(config)
    }

    /// The interval must be non-zero and fit the `setTimeout` delay argument.
    pub fn validate(&self) -> Result<()> {
        self.tick_interval()?;
        Ok(())
    }

    /// Tick interval as the `i32` delay `setTimeout` takes.
    pub fn tick_interval(&self) -> Result<i32> {
        match i32::try_from(self.tick_interval_ms) {
            Ok(ms) if ms > 0 => Ok(ms),
            _ => Err(PageError::InvalidConfig(format!(
                "tickIntervalMs must be between 1 and {}, got {}",
                i32::MAX,
                self.tick_interval_ms
            ))),
        }
    }
}
