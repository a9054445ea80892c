//! Scribe CLI - Safe markdown rendering.
//!
//! Provides commands for:
//! - `render`: Render markdown to sanitized HTML
//! - `plain`: Extract plain text from markdown
//! - `excerpt`: Produce a short plain-text summary
//! - `url`: Check a URL against the rendering policy

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ExcerptArgs, GlobalArgs, PlainArgs, RenderArgs, UrlArgs};
use output::Output;

/// Scribe - Safe markdown rendering.
#[derive(Parser)]
#[command(name = "scribe", version, about)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render markdown to HTML.
    Render(RenderArgs),
    /// Extract plain text from markdown.
    Plain(PlainArgs),
    /// Produce a plain-text excerpt of markdown.
    Excerpt(ExcerptArgs),
    /// Print the normalized form of a URL.
    Url(UrlArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables DEBUG level, otherwise use RUST_LOG
    let filter = if cli.global.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(&cli.global),
        Commands::Plain(args) => args.execute(&cli.global),
        Commands::Excerpt(args) => args.execute(&cli.global),
        Commands::Url(args) => args.execute(&cli.global),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
