use std::time::Duration;
use thiserror::Error;

/// Target discovery and phase lookup failures.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to query pods in namespace {namespace}: {source}")]
    Query {
        namespace: String,
        #[source]
        source: kube::Error,
    },
    #[error("pod {name} not found in namespace {namespace}")]
    NotFound { namespace: String, name: String },
    #[error("no running pods in namespace {namespace} match {selector}")]
    NoCandidates { namespace: String, selector: String },
    #[error("pod {name} reports unrecognized phase {phase:?}")]
    UnrecognizedPhase { name: String, phase: String },
    #[error("pod name must not be empty")]
    EmptyName,
    #[error("cluster API did not answer within {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Error)]
pub enum LogFetchError {
    #[error("failed to read logs of {namespace}/{pod}: {source}")]
    Query {
        namespace: String,
        pod: String,
        #[source]
        source: kube::Error,
    },
    #[error("log collection timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Error)]
pub enum EventFetchError {
    #[error("failed to list events in namespace {namespace}: {source}")]
    Query {
        namespace: String,
        #[source]
        source: kube::Error,
    },
    #[error("event collection timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("metrics request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("metrics backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("metrics response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("metrics query timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("analysis request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("analysis service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("analysis response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("analysis service returned no completion")]
    EmptyCompletion,
}
