//! CLI error types.

use docnav_config::ConfigError;
use docnav_site::BuildError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("Failed to serialize manifest: {0}")]
    Json(#[from] serde_json::Error),
}
