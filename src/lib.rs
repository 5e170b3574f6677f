// Public modules
pub mod types;
pub mod error;
pub mod config;
pub mod kubernetes;
pub mod prometheus;
pub mod snapshot;
pub mod analysis;
pub mod pipeline;
pub mod report;
pub mod slack;

// Re-export commonly used items
pub use types::*;
pub use error::{AnalysisError, DiscoveryError, EventFetchError, LogFetchError, MetricsError};
pub use config::{load_config, load_config_with_env, EnvironmentProvider, SystemEnvironment, DotenvEnvironment, MockEnvironment};
pub use kubernetes::{ClusterClient, KubeClusterClient};
pub use prometheus::{MetricsSource, PrometheusClient};
pub use snapshot::{assemble, DiagnosticSnapshot, MissingInput};
pub use analysis::{render_prompt, AnalysisBackend, DiagnosticReport, DiagnosticReporter, GeminiClient};
pub use pipeline::{DiagnosticPipeline, PipelineSettings};
pub use report::{render_outcome, RunOutcome};
pub use slack::{build_slack_payload, send_to_slack};
