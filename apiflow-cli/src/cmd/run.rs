use std::path::Path;

use apiflow_core::types::{ExecutionMode, Priority};
use apiflow_exec::{ExecutorConfig, SubmitError, SubmitOutcome};

use crate::cmd::config::{build_coordinator, build_engine, event_sink, open_backend};
use crate::exit_codes;
use crate::output::{print_error, print_record_text, print_result, OutputFormat};
use crate::utils::load_request;
use crate::{EventsMode, OutputArgs, StoreArgs};

/// Command-line flags that override the file's `options`.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub run_async: bool,
    pub stop_on_failure: bool,
    pub priority: Option<String>,
    pub delay: Option<u64>,
}

pub async fn run_cmd(
    path: &Path,
    overrides: RunOverrides,
    events: EventsMode,
    output: OutputArgs,
    store: StoreArgs,
) -> i32 {
    let mut request = match load_request(path, &output) {
        Ok(p) => p.request,
        Err(code) => return code,
    };

    if overrides.run_async {
        request.options.mode = ExecutionMode::Async;
    }
    if overrides.stop_on_failure {
        request.options.stop_on_failure = true;
    }
    if let Some(p) = overrides.priority.as_deref() {
        match p.parse::<Priority>() {
            Ok(p) => request.options.priority = p,
            Err(e) => {
                print_error(output.format, output.quiet, &e.to_string());
                return exit_codes::VALIDATION_FAILED;
            }
        }
    }
    if let Some(delay) = overrides.delay {
        request.options.delay_seconds = delay;
    }

    let backend = match open_backend(&store, &output).await {
        Ok(b) => b,
        Err(code) => return code,
    };
    let config = ExecutorConfig::from_env();
    let engine = build_engine(&backend, &config, event_sink(events));
    let coordinator = build_coordinator(&backend, &config, engine);

    match coordinator.submit(request).await {
        Ok(SubmitOutcome::Completed(record)) => {
            if output.format == OutputFormat::Text && !output.quiet {
                print_record_text(&record, true);
            } else {
                print_result(output.format, output.quiet, &record);
            }
            if record.summary.failed_requests > 0 {
                exit_codes::RUN_FAILED
            } else {
                exit_codes::SUCCESS
            }
        }
        Ok(SubmitOutcome::Queued(ack)) => {
            if output.format == OutputFormat::Text && !output.quiet {
                println!("Queued:               {}", ack.orchestration_id);
                println!("Queue:                {} (priority {})", ack.queue, ack.priority);
                println!("Available at:         {}", ack.available_at.to_rfc3339());
                println!("Estimated completion: {}", ack.estimated_completion_at.to_rfc3339());
            } else {
                print_result(output.format, output.quiet, &ack);
            }
            exit_codes::SUCCESS
        }
        Err(SubmitError::Validation(err)) => {
            if output.format == OutputFormat::Text && !output.quiet {
                eprintln!("error: validation failed");
                for v in &err.violations {
                    eprintln!("- {v}");
                }
            } else {
                print_result(
                    output.format,
                    output.quiet,
                    &serde_json::json!({ "valid": false, "errors": err.violations }),
                );
            }
            exit_codes::VALIDATION_FAILED
        }
        Err(SubmitError::QueueUnavailable) => {
            print_error(
                output.format,
                output.quiet,
                "asynchronous runs need a shared store. Set --store <url>, APIFLOW_DATABASE_URL, or DATABASE_URL",
            );
            exit_codes::RUNTIME_ERROR
        }
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            exit_codes::RUNTIME_ERROR
        }
    }
}
