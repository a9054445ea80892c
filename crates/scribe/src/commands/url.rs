//! `scribe url` command implementation.

use clap::Args;

use super::{GlobalArgs, renderer_from_config, write_stdout};
use crate::error::CliError;

/// Arguments for the url command.
#[derive(Args)]
pub(crate) struct UrlArgs {
    /// URL to normalize.
    url: String,
}

impl UrlArgs {
    /// Execute the url command.
    ///
    /// Prints the normalized URL. Rejected URLs print `#` and fail the command.
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let config = global.load_config(None)?;
        let renderer = renderer_from_config(&config);

        let normalized = renderer.normalize_url(&self.url);
        write_stdout(normalized.as_str())?;

        if !normalized.is_allowed() {
            return Err(CliError::Validation(format!(
                "URL rejected (only http, https and ipfs are allowed): {}",
                self.url
            )));
        }
        Ok(())
    }
}
