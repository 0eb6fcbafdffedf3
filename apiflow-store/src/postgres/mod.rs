mod cache;
mod jobs;
mod logs;
mod migrate;
mod store;

pub use migrate::run_migrations;
pub use store::PostgresStore;
