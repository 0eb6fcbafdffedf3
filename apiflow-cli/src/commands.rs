use std::path::PathBuf;

use clap::Subcommand;

use crate::args::*;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit an orchestration request file (JSON or YAML).
    Run {
        path: PathBuf,
        /// Enqueue instead of running inline.
        #[arg(long = "async")]
        run_async: bool,
        #[arg(long)]
        stop_on_failure: bool,
        #[arg(long, value_parser = ["low", "normal", "high"])]
        priority: Option<String>,
        /// Seconds before a queued run becomes available.
        #[arg(long)]
        delay: Option<u64>,
        #[arg(long, value_enum, default_value_t = EventsMode::Tracing)]
        events: EventsMode,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Show the status of an orchestration.
    Status {
        orchestration_id: String,
        /// Include a per-step breakdown.
        #[arg(long)]
        details: bool,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Remove a queued orchestration that has not started.
    Cancel {
        orchestration_id: String,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Process queued orchestrations until interrupted.
    Worker {
        #[command(flatten)]
        worker: WorkerArgs,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// List recently started orchestrations.
    Recent {
        #[arg(long, default_value_t = 10)]
        limit: i64,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Delete old request logs and failed jobs, and purge expired results.
    Cleanup {
        #[arg(long, default_value_t = 7)]
        days: u32,
        #[arg(long)]
        dry_run: bool,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Check a request file without running it.
    Validate {
        path: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Apply the database schema.
    Migrate {
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
}
