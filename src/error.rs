//! Error types
//!
//! Only two kinds of failure exist: a fatal startup failure (no surface to draw on) and
//! best-effort storage failures, which the persistence layer logs and swallows.

use thiserror::Error;

/// Errors that can stop the game from starting
#[derive(Debug, Error)]
pub enum GameError {
    /// The rendering surface could not be acquired
    #[error("rendering surface unavailable: {reason}")]
    SurfaceUnavailable { reason: String },
    /// Storage failure surfaced to a caller that asked for it
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failures of the key-value storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored record is not valid JSON: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_converts_into_game_error() {
        let err: GameError = StorageError::Unavailable("quota".into()).into();
        assert!(matches!(err, GameError::Storage(_)));
        assert_eq!(err.to_string(), "storage unavailable: quota");
    }

    #[test]
    fn test_surface_error_message() {
        let err = GameError::SurfaceUnavailable {
            reason: "zero-sized canvas".into(),
        };
        assert_eq!(
            err.to_string(),
            "rendering surface unavailable: zero-sized canvas"
        );
    }
}
