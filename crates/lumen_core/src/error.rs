//! # Animation Error Types
//!
//! Everything that can go wrong while configuring or driving an
//! animation manager. Query operations never fail; see
//! [`AnimationManager::progress`](crate::AnimationManager::progress).

use thiserror::Error;

/// Errors raised by the animation engine and its configuration layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// Rejected at construction or when changing increments at runtime.
    #[error("invalid animation configuration: {0}")]
    InvalidConfig(String),

    /// The manager was disposed and no longer accepts new animations.
    #[error("animation manager has been disposed")]
    Disposed,

    /// A theme file could not be read from disk.
    #[error("failed to read theme file {path}: {reason}")]
    ThemeRead {
        /// Path that was being read.
        path: String,
        /// Underlying I/O failure.
        reason: String,
    },

    /// A theme document was not valid TOML or did not match the schema.
    #[error("failed to parse theme: {0}")]
    ThemeParse(String),

    /// The theme does not define a preset with this name.
    #[error("unknown animation preset: {0}")]
    UnknownPreset(String),
}

/// Result type for animation operations.
pub type AnimationResult<T> = Result<T, AnimationError>;
