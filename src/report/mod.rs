use crate::analysis::DiagnosticReport;
use crate::error::AnalysisError;
use crate::snapshot::{DiagnosticSnapshot, MissingInput};
use crate::types::{PodPhase, WorkloadRef};

/// How a diagnostic run ended, short of a discovery failure
#[derive(Debug)]
pub enum RunOutcome {
    Analyzed {
        snapshot: DiagnosticSnapshot,
        phase: Option<PodPhase>,
        report: DiagnosticReport,
    },
    AnalysisFailed {
        snapshot: DiagnosticSnapshot,
        phase: Option<PodPhase>,
        error: AnalysisError,
    },
    NothingCollected {
        snapshot: DiagnosticSnapshot,
        phase: Option<PodPhase>,
    },
    PhaseUnavailable {
        target: WorkloadRef,
        status: String,
    },
}

impl RunOutcome {
    pub fn target(&self) -> &WorkloadRef {
        match self {
            RunOutcome::Analyzed { snapshot, .. }
            | RunOutcome::AnalysisFailed { snapshot, .. }
            | RunOutcome::NothingCollected { snapshot, .. } => &snapshot.target,
            RunOutcome::PhaseUnavailable { target, .. } => target,
        }
    }

    pub fn phase(&self) -> Option<PodPhase> {
        match self {
            RunOutcome::Analyzed { phase, .. }
            | RunOutcome::AnalysisFailed { phase, .. }
            | RunOutcome::NothingCollected { phase, .. } => *phase,
            RunOutcome::PhaseUnavailable { .. } => None,
        }
    }

    pub fn snapshot(&self) -> Option<&DiagnosticSnapshot> {
        match self {
            RunOutcome::Analyzed { snapshot, .. }
            | RunOutcome::AnalysisFailed { snapshot, .. }
            | RunOutcome::NothingCollected { snapshot, .. } => Some(snapshot),
            RunOutcome::PhaseUnavailable { .. } => None,
        }
    }

    pub fn report(&self) -> Option<&DiagnosticReport> {
        match self {
            RunOutcome::Analyzed { report, .. } => Some(report),
            _ => None,
        }
    }

    pub fn missing_inputs(&self) -> Vec<MissingInput> {
        self.snapshot()
            .map(|s| s.unavailable_inputs())
            .unwrap_or_default()
    }

    /// One-line description of everything except the report body
    pub fn summary_line(&self) -> String {
        match self {
            RunOutcome::Analyzed { .. } => {
                let missing = self.missing_inputs().len();
                if missing == 0 {
                    "Analysis complete".to_string()
                } else {
                    format!("Analysis complete with {} of 3 inputs unavailable", missing)
                }
            }
            RunOutcome::AnalysisFailed { error, .. } => format!("Analysis failed: {}", error),
            RunOutcome::NothingCollected { .. } => {
                "Analysis skipped: no diagnostic input could be collected".to_string()
            }
            RunOutcome::PhaseUnavailable { status, .. } => format!("Current status is {}", status),
        }
    }
}

pub fn report_title(cluster_name: Option<&str>) -> String {
    match cluster_name {
        Some(c) => format!("Kubernetes Diagnostic Report - {}", c),
        None => "Kubernetes Diagnostic Report".to_string(),
    }
}

/// Plain-text rendering printed to stdout
pub fn render_outcome(outcome: &RunOutcome, cluster_name: Option<&str>) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(report_title(cluster_name));
    lines.push(format!("Target: {}", outcome.target()));
    if let Some(phase) = outcome.phase() {
        lines.push(format!("Phase: {}", phase));
    }
    if let Some(snapshot) = outcome.snapshot() {
        lines.push(format!(
            "Collected at: {}",
            snapshot.collected_at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
        ));
    }

    let missing = outcome.missing_inputs();
    if !missing.is_empty() {
        lines.push(String::new());
        lines.push("Missing inputs:".to_string());
        for m in &missing {
            lines.push(format!("• {}: {}", m.input, m.reason));
        }
    }

    lines.push(String::new());
    match outcome.report() {
        Some(report) => {
            lines.push(format!("Analysis ({}):", report.model));
            lines.push(report.text.trim_end().to_string());
        }
        None => lines.push(outcome.summary_line()),
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::assemble;
    use crate::types::{Collected, MetricsResult};
    use chrono::Utc;

    fn target() -> WorkloadRef {
        WorkloadRef::new("web-7d9", "default").unwrap()
    }

    fn full_snapshot() -> DiagnosticSnapshot {
        assemble(
            target(),
            Collected::Available("boot ok".to_string()),
            Collected::Available("Scheduled".to_string()),
            Collected::Available(MetricsResult(serde_json::json!({"status": "success"}))),
        )
    }

    #[test]
    fn test_render_analyzed_outcome() {
        let outcome = RunOutcome::Analyzed {
            snapshot: full_snapshot(),
            phase: Some(PodPhase::Running),
            report: DiagnosticReport {
                text: "No anomalies detected.\n".to_string(),
                model: "gemini-1.5-flash".to_string(),
                generated_at: Utc::now(),
            },
        };

        let text = render_outcome(&outcome, Some("prod-eu"));
        assert!(text.starts_with("Kubernetes Diagnostic Report - prod-eu"));
        assert!(text.contains("Target: default/web-7d9"));
        assert!(text.contains("Phase: Running"));
        assert!(text.contains("Analysis (gemini-1.5-flash):\nNo anomalies detected."));
        assert!(!text.contains("Missing inputs"));
        assert_eq!(outcome.summary_line(), "Analysis complete");
    }

    #[test]
    fn test_render_lists_missing_inputs() {
        let snapshot = assemble(
            target(),
            Collected::Available("boot ok".to_string()),
            Collected::Available("Scheduled".to_string()),
            Collected::Unavailable { reason: "metrics backend returned HTTP 503: ".to_string() },
        );
        let outcome = RunOutcome::AnalysisFailed {
            snapshot,
            phase: None,
            error: AnalysisError::EmptyCompletion,
        };

        let text = render_outcome(&outcome, None);
        assert!(text.starts_with("Kubernetes Diagnostic Report\n"));
        assert!(!text.contains("Phase:"));
        assert!(text.contains("Missing inputs:\n• metrics: metrics backend returned HTTP 503"));
        assert!(text.contains("Analysis failed: analysis service returned no completion"));
    }

    #[test]
    fn test_render_phase_unavailable() {
        let outcome = RunOutcome::PhaseUnavailable {
            target: target(),
            status: "Evicted".to_string(),
        };

        assert!(outcome.snapshot().is_none());
        assert!(outcome.missing_inputs().is_empty());
        let text = render_outcome(&outcome, None);
        assert!(text.contains("Current status is Evicted"));
        assert!(!text.contains("Collected at"));
    }
}
