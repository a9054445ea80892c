//! `scribe render` command implementation.

use std::path::PathBuf;

use clap::Args;

use super::{GlobalArgs, read_input, renderer_from_config, write_stdout};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render (default: stdin).
    file: Option<PathBuf>,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl RenderArgs {
    /// Execute the render command.
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let config = global.load_config(None)?;
        let renderer = renderer_from_config(&config);

        let markdown = read_input(self.file.as_deref())?;
        let html = renderer.render(&markdown);

        match self.output {
            Some(path) => {
                std::fs::write(&path, format!("{html}\n"))?;
                Output::new().success(&format!("Rendered HTML written to {}", path.display()));
            }
            None => write_stdout(&html)?,
        }
        Ok(())
    }
}
