use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::analysis::DiagnosticReporter;
use crate::error::{DiscoveryError, EventFetchError, LogFetchError, MetricsError};
use crate::kubernetes::ClusterClient;
use crate::prometheus::MetricsSource;
use crate::report::RunOutcome;
use crate::snapshot::assemble;
use crate::types::{Collected, Config, MetricsResult, TargetSelector, WorkloadRef};

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub selector: TargetSelector,
    pub metrics_query: String,
    pub check_phase: bool,
    pub collection_timeout: Duration,
}

impl PipelineSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            selector: cfg.selector.clone(),
            metrics_query: cfg.metrics_query.clone(),
            check_phase: cfg.check_phase,
            collection_timeout: cfg.http_timeout,
        }
    }
}

/// One diagnostic run over injected collaborators.
pub struct DiagnosticPipeline {
    cluster: Arc<dyn ClusterClient>,
    metrics: Arc<dyn MetricsSource>,
    reporter: DiagnosticReporter,
    settings: PipelineSettings,
}

impl DiagnosticPipeline {
    pub fn new(
        cluster: Arc<dyn ClusterClient>,
        metrics: Arc<dyn MetricsSource>,
        reporter: DiagnosticReporter,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            cluster,
            metrics,
            reporter,
            settings,
        }
    }

    /// Discovery failures abort the run; every later failure is folded into the outcome.
    pub async fn run(&self) -> Result<RunOutcome, DiscoveryError> {
        let target = self
            .bounded(
                self.cluster.select_target(&self.settings.selector),
                DiscoveryError::Timeout,
            )
            .await?;

        let phase = if self.settings.check_phase {
            let status = self
                .bounded(self.cluster.fetch_status(&target), DiscoveryError::Timeout)
                .await;
            match status {
                Ok(phase) => {
                    info!("{} is {}", target, phase);
                    Some(phase)
                }
                Err(e) => {
                    warn!("phase check for {} failed: {}", target, e);
                    let status = match e {
                        DiscoveryError::UnrecognizedPhase { phase, .. } if !phase.is_empty() => phase,
                        other => other.to_string(),
                    };
                    return Ok(RunOutcome::PhaseUnavailable { target, status });
                }
            }
        } else {
            None
        };

        let (logs, events, metrics) = tokio::join!(
            self.collect_logs(&target),
            self.collect_events(target.namespace()),
            self.collect_metrics(),
        );

        let snapshot = assemble(target, logs, events, metrics);
        if !snapshot.has_any_input() {
            warn!("nothing collected for {}, skipping analysis", snapshot.target);
            return Ok(RunOutcome::NothingCollected { snapshot, phase });
        }

        match self.reporter.analyze(&snapshot).await {
            Ok(report) => Ok(RunOutcome::Analyzed { snapshot, phase, report }),
            Err(error) => {
                warn!("analysis of {} failed: {}", snapshot.target, error);
                Ok(RunOutcome::AnalysisFailed { snapshot, phase, error })
            }
        }
    }

    async fn bounded<T, E, F>(&self, fut: F, on_timeout: impl FnOnce(Duration) -> E) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        let limit = self.settings.collection_timeout;
        match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => Err(on_timeout(limit)),
        }
    }

    async fn collect_logs(&self, target: &WorkloadRef) -> Collected<String> {
        let result = self
            .bounded(self.cluster.fetch_logs(target), LogFetchError::Timeout)
            .await;
        if let Err(e) = &result {
            warn!("log collection failed: {}", e);
        }
        Collected::from_result(result)
    }

    async fn collect_events(&self, namespace: &str) -> Collected<String> {
        let result = self
            .bounded(self.cluster.fetch_events(namespace), EventFetchError::Timeout)
            .await;
        if let Err(e) = &result {
            warn!("event collection failed: {}", e);
        }
        Collected::from_result(result)
    }

    async fn collect_metrics(&self) -> Collected<MetricsResult> {
        let result = self
            .bounded(
                self.metrics.query_rate(&self.settings.metrics_query),
                MetricsError::Timeout,
            )
            .await;
        if let Err(e) = &result {
            warn!("metrics collection failed: {}", e);
        }
        Collected::from_result(result)
    }
}
