//! `menus validate` command implementation.

use std::path::PathBuf;

use clap::Args;
use menus_config::{CliSettings, Config};
use menus_core::SiteFixture;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the validate command.
#[derive(Args)]
pub(crate) struct ValidateArgs {
    /// Site fixture file (overrides config).
    #[arg(short, long)]
    fixture: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover menus.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ValidateArgs {
    /// Execute the validate command.
    ///
    /// # Errors
    ///
    /// Returns an error if the fixture fails to load or any link page or
    /// menu entry is invalid.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            fixture: self.fixture,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let path = &config.source_resolved.fixture;

        output.heading(&format!("Validating {}", path.display()));
        let fixture = SiteFixture::load(path, &config)?;

        let issues = fixture.validate();
        for issue in &issues {
            output.issue(&issue.subject, issue.error.field, &issue.error.message);
        }

        if issues.is_empty() {
            output.ok(&format!(
                "{} pages, {} main menus and {} flat menus are valid",
                fixture.tree.pages().len(),
                fixture.menus.main_menus().len(),
                fixture.menus.flat_menus().len()
            ));
            Ok(())
        } else {
            Err(CliError::Validation(format!(
                "{} validation errors",
                issues.len()
            )))
        }
    }
}
