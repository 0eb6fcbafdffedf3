use std::time::Duration;

use apiflow_exec::{ExecutorConfig, QueueWorker, ResultStore};

use crate::cmd::config::{build_engine, event_sink, open_shared_backend};
use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::{EventsMode, OutputArgs, StoreArgs, WorkerArgs};

fn worker_config(args: &WorkerArgs) -> ExecutorConfig {
    let mut config = ExecutorConfig::from_env();
    if let Some(queue) = &args.queue {
        config.queue = queue.clone();
    }
    if let Some(n) = args.concurrency {
        config.concurrency = n.max(1);
    }
    if let Some(secs) = args.sleep {
        config.poll_interval = Duration::from_secs(secs);
    }
    if let Some(secs) = args.timeout {
        config.job_timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }
    if let Some(n) = args.tries {
        config.max_attempts = n.max(1);
    }
    config
}

pub async fn worker_cmd(args: WorkerArgs, output: OutputArgs, store: StoreArgs) -> i32 {
    let backend = match open_shared_backend(&store, &output).await {
        Ok(b) => b,
        Err(code) => return code,
    };
    let Some(queue) = backend.queue.clone() else {
        print_error(output.format, output.quiet, "the configured store has no job queue");
        return exit_codes::RUNTIME_ERROR;
    };

    let config = worker_config(&args);
    let engine = build_engine(&backend, &config, event_sink(EventsMode::Tracing));
    let results = ResultStore::new(backend.cache.clone(), config.result_ttl);
    let worker = QueueWorker::new(queue, results, engine, config);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            return;
        }
        tracing::info!("shutdown signal received, draining in-flight runs");
    };

    match worker.run_until(shutdown).await {
        Ok(stats) => {
            if output.format == OutputFormat::Json {
                print_result(
                    output.format,
                    output.quiet,
                    &serde_json::json!({
                        "completed": stats.completed,
                        "released": stats.released,
                        "failed": stats.failed,
                    }),
                );
            }
            exit_codes::SUCCESS
        }
        Err(e) => {
            print_error(output.format, output.quiet, &format!("worker stopped: {e}"));
            exit_codes::RUNTIME_ERROR
        }
    }
}
