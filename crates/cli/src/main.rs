//! semrel CLI
//!
//! Runs semantic-release inside a container, optionally against a
//! temporarily patched `.releaserc.json`.

// CLI binary needs to output to stdout/stderr - this is intentional
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;
mod commands;
mod errors;
mod tracing;

use crate::cli::{Cli, Commands};
use crate::commands::release::{ReleaseOutcome, execute_release};
use crate::tracing::{Level, TracingConfig, TracingFormat};

const EXIT_OK: i32 = 0;
const EXIT_ERROR: i32 = 1;

#[tokio::main]
async fn main() {
    // NOTE: Using eprintln! in panic hook is intentional - tracing infrastructure
    // may be corrupted during a panic, so we use the most reliable output method.
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = cli::parse();

    let tracing_config = TracingConfig {
        format: if cli.json {
            TracingFormat::Json
        } else {
            cli.log_format.clone()
        },
        level: Level::from(cli.level.clone()),
    };
    if let Err(error) = crate::tracing::init_tracing(tracing_config) {
        eprintln!("{error:?}");
        std::process::exit(EXIT_ERROR);
    }

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{error:?}");
            EXIT_ERROR
        }
    };
    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> miette::Result<i32> {
    match cli.command {
        Commands::Version => {
            println!("{}", commands::version::get_version_info());
            Ok(EXIT_OK)
        }
        Commands::Release(args) => {
            let runtime = commands::default_runtime(args.engine_timeout_ms);
            let outcome = execute_release(&args, runtime.as_deref()).await?;

            match &outcome {
                ReleaseOutcome::Spec(json) => println!("{json}"),
                ReleaseOutcome::Ran(output) => {
                    print!("{}", output.stdout);
                    eprint!("{}", output.stderr);
                }
            }
            Ok(outcome.exit_code())
        }
    }
}
