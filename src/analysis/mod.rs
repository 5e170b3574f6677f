// Turns a snapshot into a free-text anomaly report
pub mod gemini;
pub mod prompt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

use crate::error::AnalysisError;
use crate::snapshot::DiagnosticSnapshot;

pub use gemini::GeminiClient;
pub use prompt::render_prompt;

/// A hosted text-completion service.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    fn model(&self) -> &str;

    async fn complete(&self, prompt: &str) -> Result<String, AnalysisError>;
}

#[derive(Debug, Clone)]
pub struct DiagnosticReport {
    pub text: String,
    pub model: String,
    pub generated_at: DateTime<Utc>,
}

pub struct DiagnosticReporter {
    backend: Arc<dyn AnalysisBackend>,
}

impl DiagnosticReporter {
    pub fn new(backend: Arc<dyn AnalysisBackend>) -> Self {
        Self { backend }
    }

    pub async fn analyze(&self, snapshot: &DiagnosticSnapshot) -> Result<DiagnosticReport, AnalysisError> {
        let prompt = render_prompt(snapshot);
        info!("requesting analysis of {} from {}", snapshot.target, self.backend.model());
        let text = self.backend.complete(&prompt).await?;
        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyCompletion);
        }
        Ok(DiagnosticReport {
            text,
            model: self.backend.model().to_string(),
            generated_at: Utc::now(),
        })
    }
}
