use std::path::Path;

use apiflow_core::validate_request;

use crate::exit_codes;
use crate::output::{print_result, OutputFormat};
use crate::utils::load_request;
use crate::OutputArgs;

pub async fn validate_cmd(path: &Path, output: OutputArgs) -> i32 {
    let parsed = match load_request(path, &output) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let steps = parsed.request.steps.len();
    match validate_request(&parsed.request) {
        Ok(()) => {
            if output.format == OutputFormat::Text && !output.quiet {
                println!("Valid: {steps} step(s) for user {}", parsed.request.user);
            } else {
                print_result(
                    output.format,
                    output.quiet,
                    &serde_json::json!({ "valid": true, "steps": steps }),
                );
            }
            exit_codes::SUCCESS
        }
        Err(err) => {
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
    }
}
