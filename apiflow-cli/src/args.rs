use clap::Args;

use crate::output::OutputFormat;

#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Args, Clone)]
pub struct StoreArgs {
    /// Postgres URL; falls back to APIFLOW_DATABASE_URL, then DATABASE_URL.
    #[arg(long)]
    pub store: Option<String>,
    #[arg(long, default_value_t = 5)]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EventsMode {
    /// Structured log lines on stderr.
    Tracing,
    /// JSON lines on stdout.
    Stdout,
    None,
}

#[derive(Debug, Args, Clone)]
pub struct WorkerArgs {
    /// Queue to drain (default: APIFLOW_QUEUE or "orchestration").
    #[arg(long)]
    pub queue: Option<String>,
    /// Runs processed at once.
    #[arg(long)]
    pub concurrency: Option<usize>,
    /// Seconds to sleep when the queue is empty.
    #[arg(long)]
    pub sleep: Option<u64>,
    /// Seconds a single run may take; 0 caps it only by the reservation window.
    /// Always held below APIFLOW_RETRY_AFTER_SECS.
    #[arg(long)]
    pub timeout: Option<u64>,
    /// Attempts per run before it is marked failed.
    #[arg(long)]
    pub tries: Option<u32>,
}
