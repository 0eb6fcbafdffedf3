use apiflow_store::{AuditLog, JobQueue, ResultCache, StoreError};
use chrono::Utc;

use crate::cmd::config::open_shared_backend;
use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::{OutputArgs, StoreArgs};

#[derive(Debug, Default, serde::Serialize)]
struct CleanupReport {
    dry_run: bool,
    cutoff: String,
    request_logs: u64,
    failed_jobs: u64,
    expired_results: u64,
}

pub async fn cleanup_cmd(days: u32, dry_run: bool, output: OutputArgs, store: StoreArgs) -> i32 {
    let backend = match open_shared_backend(&store, &output).await {
        Ok(b) => b,
        Err(code) => return code,
    };

    let cutoff = Utc::now() - chrono::Duration::days(i64::from(days));
    let mut report = CleanupReport {
        dry_run,
        cutoff: cutoff.to_rfc3339(),
        ..Default::default()
    };

    let result: Result<(), StoreError> = async {
        report.request_logs = backend.audit.prune(cutoff, dry_run).await?;
        if let Some(queue) = &backend.queue {
            report.failed_jobs = queue.prune_failed(cutoff, dry_run).await?;
        }
        report.expired_results = backend.cache.purge_expired(dry_run).await?;
        Ok(())
    }
    .await;

    if let Err(e) = result {
        print_error(output.format, output.quiet, &format!("cleanup failed: {e}"));
        return exit_codes::RUNTIME_ERROR;
    }

    if output.format == OutputFormat::Text && !output.quiet {
        let verb = if dry_run { "Would delete" } else { "Deleted" };
        println!("{verb} records older than {}:", report.cutoff);
        println!("  request logs:    {}", report.request_logs);
        println!("  failed jobs:     {}", report.failed_jobs);
        println!("  expired results: {}", report.expired_results);
    } else {
        print_result(output.format, output.quiet, &report);
    }
    exit_codes::SUCCESS
}
