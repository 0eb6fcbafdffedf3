use apiflow_core::CorrelationId;
use apiflow_exec::{ExecutorConfig, StatusReport};

use crate::cmd::config::{build_coordinator, build_engine, event_sink, open_shared_backend};
use crate::exit_codes;
use crate::output::{print_error, print_record_text, print_result, OutputFormat};
use crate::{EventsMode, OutputArgs, StoreArgs};

pub async fn status_cmd(orchestration_id: &str, details: bool, output: OutputArgs, store: StoreArgs) -> i32 {
    let backend = match open_shared_backend(&store, &output).await {
        Ok(b) => b,
        Err(code) => return code,
    };
    let config = ExecutorConfig::from_env();
    let engine = build_engine(&backend, &config, event_sink(EventsMode::None));
    let coordinator = build_coordinator(&backend, &config, engine);

    let id = CorrelationId::from(orchestration_id);
    let report = match coordinator.status(&id).await {
        Ok(r) => r,
        Err(e) => {
            print_error(output.format, output.quiet, &format!("status lookup failed: {e}"));
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let code = match &report {
        StatusReport::Completed { .. } | StatusReport::Processing { .. } => exit_codes::SUCCESS,
        StatusReport::Failed { .. } | StatusReport::NotFound {} => exit_codes::RUN_FAILED,
    };

    if output.format == OutputFormat::Json || output.quiet {
        print_result(output.format, output.quiet, &report);
        return code;
    }

    match report {
        StatusReport::Completed { result } => print_record_text(&result, details),
        StatusReport::Processing {
            queue,
            attempts,
            reserved,
            created_at,
            available_at,
        } => {
            println!("Orchestration: {id}");
            println!("Status:        {}", if reserved { "processing" } else { "queued" });
            println!("Queue:         {queue}");
            println!("Attempts:      {attempts}");
            println!("Submitted at:  {}", created_at.to_rfc3339());
            println!("Available at:  {}", available_at.to_rfc3339());
        }
        StatusReport::Failed { error, failed_at } => {
            println!("Orchestration: {id}");
            println!("Status:        failed");
            println!("Failed at:     {}", failed_at.to_rfc3339());
            println!("Error:         {error}");
        }
        StatusReport::NotFound {} => {
            eprintln!("error: orchestration {id} not found (results expire after {}s)", config.result_ttl.as_secs());
        }
    }
    code
}
