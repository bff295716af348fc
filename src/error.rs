//! Error types for zenoh-cli
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using CliError
pub type Result<T> = std::result::Result<T, CliError>;

/// Unified error type for zenoh-cli operations
#[derive(Debug, Error)]
pub enum CliError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // User Errors
    // -------------------------------------------------------------------------
    #[error("{0}")]
    Usage(String),

    #[error("Unknown {kind}: {name}")]
    UnknownCodec { kind: CodecKind, name: String },

    #[error("Invalid line pattern: {0}")]
    Pattern(String),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Codec ({codec}) failed: {message}")]
    Codec { codec: String, message: String },

    #[error("Plugin ({plugin}) failed to load: {message}")]
    Plugin { plugin: String, message: String },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Session Errors
    // -------------------------------------------------------------------------
    #[error("Session error: {0}")]
    Session(String),

    // -------------------------------------------------------------------------
    // Output Errors
    // -------------------------------------------------------------------------
    #[error("Render error: {0}")]
    Render(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which half of a codec an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecKind {
    Encoder,
    Decoder,
}

impl std::fmt::Display for CodecKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecKind::Encoder => f.write_str("encoder"),
            CodecKind::Decoder => f.write_str("decoder"),
        }
    }
}

impl CliError {
    /// Build a codec error from anything displayable
    pub fn codec(codec: &str, err: impl std::fmt::Display) -> Self {
        CliError::Codec {
            codec: codec.to_string(),
            message: err.to_string(),
        }
    }

    /// Build a session error from anything displayable
    pub fn session(err: impl std::fmt::Display) -> Self {
        CliError::Session(err.to_string())
    }

    /// Process exit status for this error
    ///
    /// Mistakes on the command line exit with 2, everything else with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) | CliError::UnknownCodec { .. } | CliError::Pattern(_) => 2,
            _ => 1,
        }
    }
}
