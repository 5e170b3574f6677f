use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use crate::error::DiscoveryError;

pub const DEFAULT_NAMESPACE: &str = "default";

#[derive(Debug, Clone)]
pub struct Config {
    pub namespace: String,
    pub selector: TargetSelector,
    pub container: Option<String>,
    pub check_phase: bool,
    pub prometheus_url: String,
    pub metrics_query: String,
    pub genai_api_key: String,
    pub genai_model: String,
    pub genai_temperature: f32,
    pub genai_base_url: String,
    pub http_timeout: Duration,
    pub slack_webhook_url: Option<String>,
    pub cluster_name: Option<String>,
}

/// One pod picked for a diagnostic run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadRef {
    name: String,
    namespace: String,
}

impl WorkloadRef {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Result<Self, DiscoveryError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DiscoveryError::EmptyName);
        }
        let namespace = namespace.into();
        let namespace = if namespace.trim().is_empty() {
            DEFAULT_NAMESPACE.to_string()
        } else {
            namespace
        };
        Ok(Self { name, namespace })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl fmt::Display for WorkloadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PodPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
}

impl PodPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            PodPhase::Pending => "Pending",
            PodPhase::Running => "Running",
            PodPhase::Succeeded => "Succeeded",
            PodPhase::Failed => "Failed",
            PodPhase::Unknown => "Unknown",
        }
    }
}

impl FromStr for PodPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Pending" => Ok(PodPhase::Pending),
            "Running" => Ok(PodPhase::Running),
            "Succeeded" => Ok(PodPhase::Succeeded),
            "Failed" => Ok(PodPhase::Failed),
            "Unknown" => Ok(PodPhase::Unknown),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for PodPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the pipeline picks its target pod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSelector {
    Named(String),
    Labels(String),
    MostRecentlyScheduled,
}

impl fmt::Display for TargetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetSelector::Named(name) => write!(f, "name={}", name),
            TargetSelector::Labels(labels) => write!(f, "labels {}", labels),
            TargetSelector::MostRecentlyScheduled => f.write_str("most recently scheduled"),
        }
    }
}

/// Result of one collection step; failures are kept apart from real data.
#[derive(Debug, Clone, PartialEq)]
pub enum Collected<T> {
    Available(T),
    Unavailable { reason: String },
}

impl<T> Collected<T> {
    pub fn from_result<E: fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Collected::Available(value),
            Err(e) => Collected::Unavailable { reason: e.to_string() },
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Collected::Available(_))
    }

    pub fn available(&self) -> Option<&T> {
        match self {
            Collected::Available(value) => Some(value),
            Collected::Unavailable { .. } => None,
        }
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        match self {
            Collected::Available(_) => None,
            Collected::Unavailable { reason } => Some(reason),
        }
    }
}

/// Raw Prometheus query response, exactly as returned on HTTP 200.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsResult(pub serde_json::Value);

impl MetricsResult {
    pub fn body(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn status(&self) -> Option<&str> {
        self.0.get("status").and_then(|v| v.as_str())
    }

    /// Number of series in `data.result`, when the body has that shape.
    pub fn series_count(&self) -> Option<usize> {
        self.0
            .get("data")
            .and_then(|d| d.get("result"))
            .and_then(|r| r.as_array())
            .map(|r| r.len())
    }

    pub fn to_pretty_string(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }
}

#[derive(Serialize)]
pub struct SlackPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub blocks: Vec<serde_json::Value>,
}
