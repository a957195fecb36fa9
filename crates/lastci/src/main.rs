//! lastci CLI Application
//!
//! Publishes the artifacts of a CI kernel build as a GitHub release tagged
//! `last-ci-<sha>`, and prunes old CI releases.

// CLI binary needs to output to stdout/stderr - this is intentional
#![allow(clippy::print_stdout, clippy::print_stderr)]

use lastci::cli::{self, CliError, Commands, EXIT_OK, OkEnvelope, exit_code_for, render_error};
use lastci::commands::{cleanup, publish};
use lastci::tracing::{TracingConfig, init_tracing};
use lastci_release::ExecutionContext;
use serde::Serialize;

fn main() {
    let cli = cli::parse();

    if let Err(e) = init_tracing(TracingConfig {
        format: cli.log_format,
        level: cli.level.into(),
        filter: None,
    }) {
        eprintln!("{e:?}");
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Fatal error: Failed to create tokio runtime: {e}");
            std::process::exit(1);
        }
    };

    let exit_code = rt.block_on(run(cli));
    std::process::exit(exit_code);
}

async fn run(cli: cli::Cli) -> i32 {
    let env_ctx = ExecutionContext::from_env();

    match cli.command {
        Commands::Publish(args) => match publish::execute_publish(&args, env_ctx).await {
            Ok(output) => emit(&output, cli.json, output.render()),
            Err(e) => fail(&e, cli.json),
        },
        Commands::Cleanup(args) => {
            let report = cleanup::execute_cleanup(&args, env_ctx).await;
            emit(&report, cli.json, report.render())
        }
    }
}

fn emit<T: Serialize>(data: &T, json: bool, text: String) -> i32 {
    if json {
        match serde_json::to_string(&OkEnvelope::new(data)) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                return fail(
                    &CliError::release(format!("Failed to serialize output: {e}")),
                    json,
                );
            }
        }
    } else {
        println!("{text}");
    }
    EXIT_OK
}

fn fail(err: &CliError, json: bool) -> i32 {
    render_error(err, json);
    exit_code_for(err)
}
