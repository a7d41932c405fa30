//! Configuration: timing policy for the pet state machine.
//!
//! All fixed delays of the behaviour are policy, not mechanism, so they
//! live here rather than as constants. Every field has a default and the
//! struct deserializes with `#[serde(default)]`, so a JSON file only needs
//! the keys it wants to override.

use crate::error::{PetError, PetResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Timing and viewport configuration for a [`Pet`](crate::Pet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PetConfig {
    /// Merges rapid taps into one burst. A tap restarts this window.
    pub debounce_ms: u64,
    /// Minimum hold before a press becomes a nuzzle.
    pub press_threshold_ms: u64,
    /// Quiescence before sleep onset.
    pub idle_delay_ms: u64,
    /// Delay after Idle starts rendering before the idle timer is armed,
    /// so a freshly shown Idle frame is not counted as idle time.
    pub idle_settle_ms: u64,
    /// Give up waiting for every clip's ready signal after this long.
    pub load_timeout_ms: u64,
    /// How long the "still loading" notice stays up.
    pub loading_notice_ms: u64,
    /// Fade-out period after the notice before it can show again.
    pub notice_fade_ms: u64,
    /// Viewport width in pixels.
    pub viewport_width: u32,
    /// Viewport height in pixels.
    pub viewport_height: u32,
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            press_threshold_ms: 500,
            idle_delay_ms: 10_000,
            idle_settle_ms: 500,
            load_timeout_ms: 10_000,
            loading_notice_ms: 3_000,
            notice_fade_ms: 500,
            viewport_width: 320,
            viewport_height: 240,
        }
    }
}

impl PetConfig {
    /// Parse a configuration from JSON text and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`PetError::Parse`] for malformed JSON and
    /// [`PetError::Config`] for out-of-range values.
    pub fn from_json_str(text: &str) -> PetResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`PetError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`PetConfig::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> PetResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check that the values describe a usable pet.
    ///
    /// # Errors
    ///
    /// Returns [`PetError::Config`] naming the first offending field.
    pub fn validate(&self) -> PetResult<()> {
        if self.idle_delay_ms == 0 {
            return Err(PetError::config("idle_delay_ms must be non-zero"));
        }
        if self.load_timeout_ms == 0 {
            return Err(PetError::config("load_timeout_ms must be non-zero"));
        }
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(PetError::config("viewport dimensions must be non-zero"));
        }
        Ok(())
    }

    /// Tap burst window.
    #[inline]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Press-and-hold threshold.
    #[inline]
    pub const fn press_threshold(&self) -> Duration {
        Duration::from_millis(self.press_threshold_ms)
    }

    /// Quiescent period before sleep onset.
    #[inline]
    pub const fn idle_delay(&self) -> Duration {
        Duration::from_millis(self.idle_delay_ms)
    }

    /// Settling delay after Idle becomes visible.
    #[inline]
    pub const fn idle_settle(&self) -> Duration {
        Duration::from_millis(self.idle_settle_ms)
    }

    /// Fallback for clips that never report ready.
    #[inline]
    pub const fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    /// Visible duration of the loading notice.
    #[inline]
    pub const fn loading_notice(&self) -> Duration {
        Duration::from_millis(self.loading_notice_ms)
    }

    /// Fade period after the loading notice.
    #[inline]
    pub const fn notice_fade(&self) -> Duration {
        Duration::from_millis(self.notice_fade_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_behaviour() {
        let config = PetConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(500));
        assert_eq!(config.press_threshold(), Duration::from_millis(500));
        assert_eq!(config.idle_delay(), Duration::from_secs(10));
        assert_eq!(config.idle_settle(), Duration::from_millis(500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PetConfig::from_json_str(r#"{ "idle_delay_ms": 2500 }"#).unwrap();
        assert_eq!(config.idle_delay_ms, 2500);
        assert_eq!(config.debounce_ms, 500);
    }

    #[test]
    fn test_zero_idle_delay_rejected() {
        let err = PetConfig::from_json_str(r#"{ "idle_delay_ms": 0 }"#).unwrap_err();
        assert!(matches!(err, PetError::Config(_)));
    }

    #[test]
    fn test_zero_viewport_rejected() {
        let config = PetConfig {
            viewport_height: 0,
            ..PetConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = PetConfig::from_json_str("{ idle").unwrap_err();
        assert!(matches!(err, PetError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = PetConfig::from_path("/nonexistent/petclip.json").unwrap_err();
        assert!(matches!(err, PetError::Io(_)));
    }
}
