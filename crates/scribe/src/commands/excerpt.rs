//! `scribe excerpt` command implementation.

use std::path::PathBuf;

use clap::Args;

use super::{GlobalArgs, read_input, renderer_from_config, write_stdout};
use crate::error::CliError;

/// Arguments for the excerpt command.
#[derive(Args)]
pub(crate) struct ExcerptArgs {
    /// Markdown file to read (default: stdin).
    file: Option<PathBuf>,

    /// Maximum excerpt length in characters (overrides config).
    #[arg(short, long)]
    max_chars: Option<usize>,
}

impl ExcerptArgs {
    /// Execute the excerpt command.
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let config = global.load_config(self.max_chars)?;
        let renderer = renderer_from_config(&config);

        let markdown = read_input(self.file.as_deref())?;
        write_stdout(&renderer.excerpt(&markdown, config.excerpt.max_chars))
    }
}
