//! CLI error types.

use menus_config::ConfigError;
use menus_core::{FixtureError, MenuError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Fixture(#[from] FixtureError),

    #[error("{0}")]
    Menu(#[from] MenuError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),
}
