//! CLI command implementations.

pub(crate) mod excerpt;
pub(crate) mod plain;
pub(crate) mod render;
pub(crate) mod url;

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use scribe_config::{CliSettings, Config};
use scribe_renderer::{MarkdownRenderer, UrlPolicy};

use crate::error::CliError;

pub(crate) use excerpt::ExcerptArgs;
pub(crate) use plain::PlainArgs;
pub(crate) use render::RenderArgs;
pub(crate) use url::UrlArgs;

/// Options shared by every command.
#[derive(Args)]
pub(crate) struct GlobalArgs {
    /// Path to configuration file (default: auto-discover scribe.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output (show degraded URLs and unterminated fences).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// IPFS gateway prefix for ipfs:// URLs (overrides config).
    #[arg(long, global = true)]
    pub ipfs_gateway: Option<String>,

    /// Do not open rendered links in a new tab.
    #[arg(long, global = true)]
    pub no_external_links: bool,
}

impl GlobalArgs {
    /// Build CLI settings from the global flags.
    fn cli_settings(&self, excerpt_max_chars: Option<usize>) -> CliSettings {
        CliSettings {
            ipfs_gateway: self.ipfs_gateway.clone(),
            external_links: self.no_external_links.then_some(false),
            excerpt_max_chars,
        }
    }

    /// Load configuration, applying global flags and the excerpt length override.
    pub(crate) fn load_config(
        &self,
        excerpt_max_chars: Option<usize>,
    ) -> Result<Config, CliError> {
        let cli_settings = self.cli_settings(excerpt_max_chars);
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Build a renderer from loaded configuration.
pub(crate) fn renderer_from_config(config: &Config) -> MarkdownRenderer {
    MarkdownRenderer::new()
        .with_url_policy(UrlPolicy::new().with_gateway(config.render.ipfs_gateway.as_str()))
        .with_external_links(config.render.external_links)
}

/// Read markdown from a file, or from stdin when no file (or `-`) is given.
pub(crate) fn read_input(file: Option<&Path>) -> Result<String, CliError> {
    match file {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

/// Write `text` followed by a newline to stdout.
pub(crate) fn write_stdout(text: &str) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{text}")?;
    stdout.flush()?;
    Ok(())
}
