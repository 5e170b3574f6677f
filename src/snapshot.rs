use chrono::{DateTime, Utc};

use crate::types::{Collected, MetricsResult, WorkloadRef};

/// Everything collected for one diagnostic run. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct DiagnosticSnapshot {
    pub target: WorkloadRef,
    pub logs: Collected<String>,
    pub events: Collected<String>,
    pub metrics: Collected<MetricsResult>,
    pub collected_at: DateTime<Utc>,
}

/// An input that could not be collected, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingInput {
    pub input: &'static str,
    pub reason: String,
}

impl DiagnosticSnapshot {
    pub fn unavailable_inputs(&self) -> Vec<MissingInput> {
        let sources = [
            ("logs", self.logs.unavailable_reason()),
            ("events", self.events.unavailable_reason()),
            ("metrics", self.metrics.unavailable_reason()),
        ];
        sources
            .into_iter()
            .filter_map(|(input, reason)| {
                reason.map(|r| MissingInput {
                    input,
                    reason: r.to_string(),
                })
            })
            .collect()
    }

    pub fn has_any_input(&self) -> bool {
        self.logs.is_available() || self.events.is_available() || self.metrics.is_available()
    }
}

/// Bundle the three collection results without inspecting them.
pub fn assemble(
    target: WorkloadRef,
    logs: Collected<String>,
    events: Collected<String>,
    metrics: Collected<MetricsResult>,
) -> DiagnosticSnapshot {
    DiagnosticSnapshot {
        target,
        logs,
        events,
        metrics,
        collected_at: Utc::now(),
    }
}
