use std::sync::Arc;

use apiflow_exec::{
    AuditRecorder, Coordinator, Engine, EventSink, ExecutorConfig, NoOpEventSink, ReqwestHttpClient,
    ResultStore, StdoutEventSink, TracingEventSink,
};
use apiflow_store::{AuditLog, JobQueue, MemoryStore, PostgresStore, ResultCache};

use crate::exit_codes;
use crate::output::print_error;
use crate::utils::redact_url_password;
use crate::{EventsMode, OutputArgs, StoreArgs};

/// Collaborators behind the coordinator. Without a database the queue is absent.
pub struct Backend {
    pub queue: Option<Arc<dyn JobQueue>>,
    pub cache: Arc<dyn ResultCache>,
    pub audit: Arc<dyn AuditLog>,
}

pub fn database_url(store: &StoreArgs) -> Option<String> {
    store
        .store
        .clone()
        .or_else(|| std::env::var("APIFLOW_DATABASE_URL").ok())
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .filter(|s| !s.trim().is_empty())
}

pub fn require_database_url(store: &StoreArgs, output: &OutputArgs) -> Option<String> {
    let url = database_url(store);
    if url.is_none() {
        print_error(
            output.format,
            output.quiet,
            "missing database URL. Set --store <url>, APIFLOW_DATABASE_URL, or DATABASE_URL environment variable",
        );
    }
    url
}

pub async fn connect(url: &str, store: &StoreArgs, output: &OutputArgs) -> Result<Arc<PostgresStore>, i32> {
    match PostgresStore::connect(url, store.max_connections).await {
        Ok(pg) => Ok(Arc::new(pg)),
        Err(e) => {
            let safe_url = redact_url_password(url);
            print_error(
                output.format,
                output.quiet,
                &format!("database connection failed to {safe_url}: {e}. Check your DATABASE_URL and ensure Postgres is running."),
            );
            Err(exit_codes::RUNTIME_ERROR)
        }
    }
}

/// Postgres when a URL is configured, otherwise an in-process store without a queue.
pub async fn open_backend(store: &StoreArgs, output: &OutputArgs) -> Result<Backend, i32> {
    match database_url(store) {
        Some(url) => {
            let pg = connect(&url, store, output).await?;
            Ok(shared_backend(pg))
        }
        None => {
            let mem = Arc::new(MemoryStore::new());
            Ok(Backend {
                queue: None,
                cache: mem.clone(),
                audit: mem,
            })
        }
    }
}

/// Opens the shared store; fails when no database is configured.
pub async fn open_shared_backend(store: &StoreArgs, output: &OutputArgs) -> Result<Backend, i32> {
    let url = require_database_url(store, output).ok_or(exit_codes::RUNTIME_ERROR)?;
    let pg = connect(&url, store, output).await?;
    Ok(shared_backend(pg))
}

fn shared_backend(pg: Arc<PostgresStore>) -> Backend {
    Backend {
        queue: Some(pg.clone()),
        cache: pg.clone(),
        audit: pg,
    }
}

pub fn event_sink(mode: EventsMode) -> Arc<dyn EventSink> {
    match mode {
        EventsMode::Tracing => Arc::new(TracingEventSink),
        EventsMode::Stdout => Arc::new(StdoutEventSink),
        EventsMode::None => Arc::new(NoOpEventSink),
    }
}

pub fn build_engine(backend: &Backend, config: &ExecutorConfig, events: Arc<dyn EventSink>) -> Arc<Engine> {
    Arc::new(
        Engine::new(Arc::new(ReqwestHttpClient::default()))
            .with_audit(AuditRecorder::new(backend.audit.clone()))
            .with_events(events)
            .with_default_timeout(config.default_step_timeout),
    )
}

pub fn build_coordinator(backend: &Backend, config: &ExecutorConfig, engine: Arc<Engine>) -> Coordinator {
    let results = ResultStore::new(backend.cache.clone(), config.result_ttl);
    let coordinator = Coordinator::new(engine, results, config.clone());
    match &backend.queue {
        Some(queue) => coordinator.with_queue(queue.clone()),
        None => coordinator,
    }
}
