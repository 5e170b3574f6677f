use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::types::{Config, TargetSelector, DEFAULT_NAMESPACE};

pub const DEFAULT_PROMETHEUS_URL: &str = "http://localhost:9090/api/v1";
pub const DEFAULT_METRICS_QUERY: &str = "sum(rate(container_cpu_usage_seconds_total[1m])) by (pod)";
pub const DEFAULT_GENAI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GENAI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GENAI_TEMPERATURE: f32 = 0.5;
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Trait for abstracting environment variable access
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;
}

/// Production implementation using std::env
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Process environment layered over the entries of a `.env` file.
///
/// Process variables always win; the file only fills gaps.
#[derive(Debug, Default)]
pub struct DotenvEnvironment {
    file_vars: HashMap<String, String>,
}

impl DotenvEnvironment {
    /// Reads `.env` from the working directory; a missing file is not an error.
    pub fn from_working_dir() -> Result<Self> {
        Self::from_path(".env")
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("no env file at {}", path.display());
            return Ok(Self::default());
        }
        let mut file_vars = HashMap::new();
        let iter = dotenvy::from_path_iter(path)
            .with_context(|| format!("Failed to open env file {}", path.display()))?;
        for item in iter {
            let (key, value) = item.with_context(|| format!("Invalid entry in {}", path.display()))?;
            file_vars.insert(key, value);
        }
        debug!("loaded {} entries from {}", file_vars.len(), path.display());
        Ok(Self { file_vars })
    }
}

impl EnvironmentProvider for DotenvEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().or_else(|| self.file_vars.get(key).cloned())
    }
}

/// Mock implementation for testing
#[derive(Debug, Default)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

impl MockEnvironment {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    pub fn set_var<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn with_var<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.set_var(key, value);
        self
    }
}

impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub fn load_config() -> Result<Config> {
    let env = DotenvEnvironment::from_working_dir()?;
    load_config_with_env(&env)
}

pub fn load_config_with_env<E: EnvironmentProvider>(env: &E) -> Result<Config> {
    let non_empty = |key: &str| {
        env.get_var(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let namespace = non_empty("NAMESPACE").unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

    let selector = match (non_empty("TARGET_POD"), non_empty("TARGET_SELECTOR")) {
        (Some(_), Some(_)) => {
            return Err(anyhow!("TARGET_POD and TARGET_SELECTOR are mutually exclusive"));
        }
        (Some(name), None) => TargetSelector::Named(name),
        (None, Some(labels)) => TargetSelector::Labels(labels),
        (None, None) => TargetSelector::MostRecentlyScheduled,
    };

    let container = non_empty("TARGET_CONTAINER");

    let check_phase = env.get_var("CHECK_PHASE")
        .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "True"))
        .unwrap_or(true);

    let prometheus_url = non_empty("PROMETHEUS_URL")
        .unwrap_or_else(|| DEFAULT_PROMETHEUS_URL.to_string())
        .trim_end_matches('/')
        .to_string();

    let metrics_query = non_empty("METRICS_QUERY").unwrap_or_else(|| DEFAULT_METRICS_QUERY.to_string());

    let genai_api_key = non_empty("GENAI_API_KEY")
        .ok_or_else(|| anyhow!("GENAI_API_KEY must be provided via Secret env"))?;

    let genai_model = non_empty("GENAI_MODEL").unwrap_or_else(|| DEFAULT_GENAI_MODEL.to_string());

    let genai_temperature: f32 = match non_empty("GENAI_TEMPERATURE") {
        Some(v) => v.parse().context("Invalid GENAI_TEMPERATURE")?,
        None => DEFAULT_GENAI_TEMPERATURE,
    };
    if !(0.0..=2.0).contains(&genai_temperature) {
        return Err(anyhow!("GENAI_TEMPERATURE must be between 0.0 and 2.0, got {}", genai_temperature));
    }

    let genai_base_url = non_empty("GENAI_BASE_URL")
        .unwrap_or_else(|| DEFAULT_GENAI_BASE_URL.to_string())
        .trim_end_matches('/')
        .to_string();

    let timeout_secs: u64 = match non_empty("HTTP_TIMEOUT_SECONDS") {
        Some(v) => v.parse().context("Invalid HTTP_TIMEOUT_SECONDS")?,
        None => DEFAULT_HTTP_TIMEOUT_SECONDS,
    };
    if timeout_secs == 0 {
        return Err(anyhow!("HTTP_TIMEOUT_SECONDS must be greater than zero"));
    }

    let slack_webhook_url = non_empty("SLACK_WEBHOOK_URL");
    let cluster_name = non_empty("CLUSTER_NAME");

    Ok(Config {
        namespace,
        selector,
        container,
        check_phase,
        prometheus_url,
        metrics_query,
        genai_api_key,
        genai_model,
        genai_temperature,
        genai_base_url,
        http_timeout: Duration::from_secs(timeout_secs),
        slack_webhook_url,
        cluster_name,
    })
}
