//! Error types.
//!
//! Two families live here. [`PetError`] covers the fallible edges of the
//! crate (configuration loading, terminal io). [`PlaybackError`] is what a
//! media handle reports when it refuses to play; the state machine logs it
//! and carries on, it never bubbles up as an `Err`.

/// Convenience result type used across petclip.
pub type PetResult<T> = Result<T, PetError>;

/// Top-level error taxonomy for configuration and io.
#[derive(thiserror::Error, Debug)]
pub enum PetError {
    /// Configuration values are out of range.
    #[error("config error: {0}")]
    Config(String),

    /// Configuration text could not be parsed.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Underlying io failure (config file, terminal).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PetError {
    /// Build a [`PetError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Why a clip refused (or stopped) playback.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// The media has not finished loading.
    #[error("clip is not ready for playback")]
    NotReady,

    /// The platform refused playback (e.g. no user-gesture permission).
    #[error("playback not allowed: {0}")]
    NotAllowed(String),

    /// The media could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_message() {
        let err = PetError::config("idle_delay_ms must be non-zero");
        assert_eq!(err.to_string(), "config error: idle_delay_ms must be non-zero");
    }

    #[test]
    fn test_parse_error_from_serde() {
        let err: PetError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, PetError::Parse(_)));
        assert!(err.to_string().starts_with("config parse error"));
    }

    #[test]
    fn test_playback_error_display() {
        assert_eq!(PlaybackError::NotReady.to_string(), "clip is not ready for playback");
        assert_eq!(
            PlaybackError::NotAllowed("no gesture".into()).to_string(),
            "playback not allowed: no gesture"
        );
    }
}
