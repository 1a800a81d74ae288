//! CLI entry point and dispatch.
//!
//! `run()` parses arguments, sets up logging, discovers configuration, builds
//! the tokio runtime and dispatches to a command. It prints every error itself
//! and hands only the exit code back to `main`.

use clap::Parser;

use super::args::{Cli, Commands};
use super::commands;

use crate::error_reporter::{render_report, report_anyhow};
use crate::exit_codes::exit_code_for;
use crate::{CliArgs, Config, ExitCode};

pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    if let Err(e) = siteforge_utils::logging::init_tracing(cli.verbose, cli.log_json) {
        eprintln!("warning: logging is disabled: {e}");
    }

    let operation = cli.command.operation();
    let cli_args = cli_args(&cli);

    // Decoding a saved log does not need (or fail on) configuration.
    let config = if matches!(cli.command, Commands::Decode { .. }) {
        None
    } else {
        match Config::discover(&cli_args) {
            Ok(config) => Some(config),
            Err(err) => {
                eprintln!("{}", render_report(&err, operation));
                return Err(ExitCode::from(&err));
            }
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("✗ Failed to create async runtime: {e}");
            return Err(ExitCode::FAILURE);
        }
    };

    let result = rt.block_on(async {
        match (cli.command, config) {
            (Commands::Decode { input, json }, _) => commands::execute_decode_command(&input, json),
            (
                Commands::Generate {
                    prompt,
                    out,
                    wire,
                    ..
                },
                Some(config),
            ) => commands::execute_generate_command(&prompt, out.as_deref(), wire, &config).await,
            (Commands::Providers { json }, Some(config)) => {
                commands::execute_providers_command(json, &config)
            }
            (Commands::Config, Some(config)) => commands::execute_config_command(&config),
            (_, None) => Err(anyhow::anyhow!("configuration was not loaded")),
        }
    });

    if let Err(error) = result {
        eprintln!("{}", report_anyhow(&error, operation));
        return Err(exit_code_for(&error));
    }
    Ok(())
}

fn cli_args(cli: &Cli) -> CliArgs {
    let mut args = CliArgs {
        config_path: cli.config.clone(),
        request_timeout_secs: cli.request_timeout,
        ..CliArgs::default()
    };
    if let Commands::Generate {
        seed,
        provider,
        similarity_threshold,
        ..
    } = &cli.command
    {
        args.seed = *seed;
        args.provider = provider.clone();
        args.similarity_threshold = *similarity_threshold;
    }
    args
}
