//! CLI argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// siteforge - turn a one-line prompt into a styled React + Tailwind site
#[derive(Parser, Debug)]
#[command(name = "siteforge")]
#[command(about = "Generate a styled React + Tailwind site from a one-line prompt")]
#[command(long_about = r#"
siteforge turns a short business description into a complete front-end project:
it analyzes intent, drafts a design brief that avoids repeating recent designs,
and generates one component per page section through whichever text-generation
backend is configured. Every step is recorded in a replayable progress log.

EXAMPLES:
  # Generate a site and write it to ./out
  siteforge generate "skate shop, dark and edgy" --out out

  # Print the final progress log in wire format
  siteforge generate "family trattoria in Leeds" --wire > run.wire

  # Replay a saved (possibly truncated) log
  siteforge decode run.wire

  # Show configured backends and which one each task category uses
  siteforge providers

CONFIGURATION:
  Precedence: CLI flags > environment > config file > defaults
  The config file is --config, SITEFORGE_CONFIG, or the nearest .siteforge/config.toml
  Backends are enabled by exporting their API key (ANTHROPIC_API_KEY, OPENAI_API_KEY,
  OPENROUTER_API_KEY, GEMINI_API_KEY)
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Request timeout in seconds for backend calls
    #[arg(long, global = true)]
    pub request_timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one generation
    Generate {
        /// One-line description of the site
        prompt: String,

        /// Directory to write the generated files into
        #[arg(long)]
        out: Option<PathBuf>,

        /// Seed for the design randomness
        #[arg(long)]
        seed: Option<u64>,

        /// Print the final log as a wire string instead of progress lines
        #[arg(long)]
        wire: bool,

        /// Backend id to try first for every request
        #[arg(long)]
        provider: Option<String>,

        /// Override the design similarity threshold (0..1)
        #[arg(long)]
        similarity_threshold: Option<f64>,
    },

    /// Decode a wire-format progress log and print its steps
    Decode {
        /// File to read, or `-` for stdin
        input: String,

        /// Print the decoded steps as JSON
        #[arg(long)]
        json: bool,
    },

    /// List configured backends and the selection per task category
    Providers {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration with value sources
    Config,
}

impl Commands {
    /// Operation name used in error reports.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Generate { .. } => "generate",
            Self::Decode { .. } => "decode",
            Self::Providers { .. } => "providers",
            Self::Config => "config",
        }
    }
}
