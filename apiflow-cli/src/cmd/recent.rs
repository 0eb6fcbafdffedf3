use apiflow_core::CorrelationId;
use apiflow_exec::{ExecutorConfig, StatusReport};
use apiflow_store::AuditLog;
use chrono::{DateTime, Utc};

use crate::cmd::config::{build_coordinator, build_engine, event_sink, open_shared_backend};
use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::{EventsMode, OutputArgs, StoreArgs};

#[derive(Debug, serde::Serialize)]
struct RecentEntry {
    orchestration_id: String,
    user: String,
    started_at: DateTime<Utc>,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    success_rate: Option<f64>,
}

fn status_label(report: &StatusReport) -> &'static str {
    match report {
        StatusReport::Completed { .. } => "completed",
        StatusReport::Processing { reserved: true, .. } => "processing",
        StatusReport::Processing { .. } => "queued",
        StatusReport::Failed { .. } => "failed",
        StatusReport::NotFound {} => "expired",
    }
}

pub async fn recent_cmd(limit: i64, output: OutputArgs, store: StoreArgs) -> i32 {
    let backend = match open_shared_backend(&store, &output).await {
        Ok(b) => b,
        Err(code) => return code,
    };
    let config = ExecutorConfig::from_env();
    let engine = build_engine(&backend, &config, event_sink(EventsMode::None));
    let coordinator = build_coordinator(&backend, &config, engine);

    let activity = match backend.audit.recent_orchestrations(limit.max(1)).await {
        Ok(a) => a,
        Err(e) => {
            print_error(output.format, output.quiet, &format!("failed to list orchestrations: {e}"));
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let mut entries = Vec::with_capacity(activity.len());
    for a in activity {
        let (status, success_rate) =
            match coordinator.status(&CorrelationId::from(a.orchestration_id.as_str())).await {
                Ok(report) => {
                    let rate = match &report {
                        StatusReport::Completed { result } => Some(result.summary.success_rate),
                        _ => None,
                    };
                    (status_label(&report), rate)
                }
                Err(e) => {
                    tracing::warn!(orchestration_id = %a.orchestration_id, error = %e, "status lookup failed");
                    ("unknown", None)
                }
            };
        entries.push(RecentEntry {
            orchestration_id: a.orchestration_id,
            user: a.caller,
            started_at: a.started_at,
            status,
            success_rate,
        });
    }

    if output.format == OutputFormat::Json || output.quiet {
        print_result(output.format, output.quiet, &entries);
        return exit_codes::SUCCESS;
    }

    if entries.is_empty() {
        println!("No orchestrations recorded.");
        return exit_codes::SUCCESS;
    }
    println!("{:<40} {:<20} {:<26} {:<11} SUCCESS", "ORCHESTRATION", "USER", "STARTED", "STATUS");
    for e in &entries {
        let rate = e.success_rate.map(|r| format!("{r}%")).unwrap_or_else(|| "-".to_string());
        println!(
            "{:<40} {:<20} {:<26} {:<11} {}",
            e.orchestration_id,
            e.user,
            e.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            e.status,
            rate
        );
    }
    exit_codes::SUCCESS
}
