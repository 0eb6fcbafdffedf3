use apiflow_core::CorrelationId;
use apiflow_exec::ExecutorConfig;

use crate::cmd::config::{build_coordinator, build_engine, event_sink, open_shared_backend};
use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::{EventsMode, OutputArgs, StoreArgs};

pub async fn cancel_cmd(orchestration_id: &str, output: OutputArgs, store: StoreArgs) -> i32 {
    let backend = match open_shared_backend(&store, &output).await {
        Ok(b) => b,
        Err(code) => return code,
    };
    let config = ExecutorConfig::from_env();
    let engine = build_engine(&backend, &config, event_sink(EventsMode::None));
    let coordinator = build_coordinator(&backend, &config, engine);

    let outcome = match coordinator.cancel(&CorrelationId::from(orchestration_id)).await {
        Ok(o) => o,
        Err(e) => {
            print_error(output.format, output.quiet, &format!("cancel failed: {e}"));
            return exit_codes::RUNTIME_ERROR;
        }
    };

    if output.format == OutputFormat::Text && !output.quiet {
        if outcome.cancelled {
            println!("Cancelled {} ({} queued job(s) removed)", outcome.orchestration_id, outcome.removed);
        } else {
            eprintln!(
                "error: {} is not queued; it may be running, finished, or unknown",
                outcome.orchestration_id
            );
        }
    } else {
        print_result(output.format, output.quiet, &outcome);
    }

    if outcome.cancelled {
        exit_codes::SUCCESS
    } else {
        exit_codes::RUN_FAILED
    }
}
