use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod args;
mod cmd;
mod commands;
mod exit_codes;
mod output;
mod utils;

pub use args::*;
use commands::Command;

#[derive(Debug, Parser)]
#[command(name = "apiflow", version, about = "Sequential HTTP API orchestration")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,apiflow=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create tokio runtime: {e}");
            std::process::exit(exit_codes::RUNTIME_ERROR);
        }
    };

    let exit_code = rt.block_on(run_command(cli.command));
    std::process::exit(exit_code);
}

async fn run_command(command: Command) -> i32 {
    match command {
        Command::Run {
            path,
            run_async,
            stop_on_failure,
            priority,
            delay,
            events,
            output,
            store,
        } => {
            let overrides = cmd::run::RunOverrides {
                run_async,
                stop_on_failure,
                priority,
                delay,
            };
            cmd::run::run_cmd(&path, overrides, events, output, store).await
        }
        Command::Status {
            orchestration_id,
            details,
            output,
            store,
        } => cmd::status::status_cmd(&orchestration_id, details, output, store).await,
        Command::Cancel {
            orchestration_id,
            output,
            store,
        } => cmd::cancel::cancel_cmd(&orchestration_id, output, store).await,
        Command::Worker {
            worker,
            output,
            store,
        } => cmd::worker::worker_cmd(worker, output, store).await,
        Command::Recent {
            limit,
            output,
            store,
        } => cmd::recent::recent_cmd(limit, output, store).await,
        Command::Cleanup {
            days,
            dry_run,
            output,
            store,
        } => cmd::cleanup::cleanup_cmd(days, dry_run, output, store).await,
        Command::Validate { path, output } => cmd::validate::validate_cmd(&path, output).await,
        Command::Migrate { output, store } => cmd::migrate::migrate_cmd(store, output).await,
    }
}
