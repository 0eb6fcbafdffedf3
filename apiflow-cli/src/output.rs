use apiflow_core::OrchestrationRecord;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn print_result<T: Serialize>(format: OutputFormat, quiet: bool, result: &T) {
    if quiet {
        return;
    }
    let rendered = match format {
        OutputFormat::Text => serde_json::to_string_pretty(result),
        OutputFormat::Json => serde_json::to_string(result),
    };
    if let Ok(json) = rendered {
        println!("{json}");
    }
}

pub fn print_error(format: OutputFormat, quiet: bool, message: &str) {
    if quiet {
        return;
    }
    match format {
        OutputFormat::Text => eprintln!("error: {message}"),
        OutputFormat::Json => {
            let err = serde_json::json!({"error": message});
            eprintln!("{}", serde_json::to_string(&err).unwrap_or_default());
        }
    }
}

/// Human-readable summary of a finished run, with an optional per-step table.
pub fn print_record_text(record: &OrchestrationRecord, details: bool) {
    let s = &record.summary;
    println!("Orchestration: {}", record.orchestration_id);
    println!("User:          {}", record.user);
    println!("Status:        {}", record.state.as_str());
    if record.stopped_early {
        println!("Stopped early: yes");
    }
    println!("Finished at:   {}", record.timestamp.to_rfc3339());
    println!();
    println!("Requests:      {}", s.total_requests);
    println!("Successful:    {}", s.successful_requests);
    println!("Failed:        {}", s.failed_requests);
    println!("Success rate:  {}%", s.success_rate);
    println!("Total time:    {}ms", s.total_duration_ms);
    println!("Average time:  {}ms", s.average_duration_ms);

    if !details {
        return;
    }
    println!();
    println!("{:<5} {:<7} {:<6} {:>10}  {:<40}  ERROR", "#", "METHOD", "STATUS", "TIME(ms)", "URL");
    for r in &record.results {
        let error = r.error.as_deref().map(|e| truncate(e, 50)).unwrap_or_else(|| "-".to_string());
        println!(
            "{:<5} {:<7} {:<6} {:>10}  {:<40}  {}",
            r.index,
            r.method.as_str(),
            r.status_code,
            r.duration_ms,
            truncate(&r.url, 40),
            error
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let head: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{head}...")
}
