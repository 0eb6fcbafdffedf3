use apiflow_store::run_migrations;

use crate::cmd::config::{connect, require_database_url};
use crate::exit_codes;
use crate::output::{print_error, print_result};
use crate::{OutputArgs, StoreArgs};

pub async fn migrate_cmd(store: StoreArgs, output: OutputArgs) -> i32 {
    let Some(url) = require_database_url(&store, &output) else {
        return exit_codes::RUNTIME_ERROR;
    };
    let pg = match connect(&url, &store, &output).await {
        Ok(pg) => pg,
        Err(code) => return code,
    };

    match run_migrations(pg.pool()).await {
        Ok(count) => {
            print_result(
                output.format,
                output.quiet,
                &serde_json::json!({ "migrated": true, "migrations": count }),
            );
            exit_codes::SUCCESS
        }
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            exit_codes::RUNTIME_ERROR
        }
    }
}
