use apiflow_core::types::{OrchestrationRecord, RunState, RunSummary, StepResult};
use apiflow_core::CorrelationId;
use chrono::Utc;

/// Whether the step loop keeps going after a result is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Stop,
}

/// Per-run state: `pending -> running -> {aborted ->} completed`. Never re-entered.
pub(crate) struct RunMachine {
    state: RunState,
    stop_on_failure: bool,
    results: Vec<StepResult>,
}

impl RunMachine {
    pub(crate) fn new(stop_on_failure: bool) -> Self {
        Self {
            state: RunState::Pending,
            stop_on_failure,
            results: Vec::new(),
        }
    }

    pub(crate) fn start(&mut self) {
        debug_assert_eq!(self.state, RunState::Pending);
        self.state = RunState::Running;
    }

    pub(crate) fn state(&self) -> RunState {
        self.state
    }

    pub(crate) fn results(&self) -> &[StepResult] {
        &self.results
    }

    /// Appends a result, making it visible to later steps, and decides whether to continue.
    pub(crate) fn record(&mut self, result: StepResult) -> Flow {
        let failed = !result.success;
        self.results.push(result);
        if failed && self.stop_on_failure {
            self.state = RunState::Aborted;
            Flow::Stop
        } else {
            Flow::Continue
        }
    }

    pub(crate) fn finish(self, orchestration_id: CorrelationId, user: String) -> OrchestrationRecord {
        let stopped_early = self.state == RunState::Aborted;
        OrchestrationRecord {
            orchestration_id,
            user,
            state: RunState::Completed,
            stopped_early,
            summary: RunSummary::from_results(&self.results),
            timestamp: Utc::now(),
            results: self.results,
        }
    }
}
