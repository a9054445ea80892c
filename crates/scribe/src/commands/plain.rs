//! `scribe plain` command implementation.

use std::path::PathBuf;

use clap::Args;

use super::{GlobalArgs, read_input, renderer_from_config, write_stdout};
use crate::error::CliError;

/// Arguments for the plain command.
#[derive(Args)]
pub(crate) struct PlainArgs {
    /// Markdown file to read (default: stdin).
    file: Option<PathBuf>,
}

impl PlainArgs {
    /// Execute the plain command.
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let config = global.load_config(None)?;
        let renderer = renderer_from_config(&config);

        let markdown = read_input(self.file.as_deref())?;
        write_stdout(&renderer.plain_text(&markdown))
    }
}
