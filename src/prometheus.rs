use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, error};

use crate::error::MetricsError;
use crate::types::MetricsResult;

/// A backend that answers one instant query.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn query_rate(&self, expression: &str) -> Result<MetricsResult, MetricsError>;
}

pub struct PrometheusClient {
    client: reqwest::Client,
    base_url: String,
}

impl PrometheusClient {
    /// `base_url` is the API root, e.g. `http://localhost:9090/api/v1`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, MetricsError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn query_url(&self) -> String {
        format!("{}/query", self.base_url)
    }
}

#[async_trait]
impl MetricsSource for PrometheusClient {
    async fn query_rate(&self, expression: &str) -> Result<MetricsResult, MetricsError> {
        let url = self.query_url();
        debug!("querying {} with {}", url, expression);
        let res = self
            .client
            .get(&url)
            .query(&[("query", expression)])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        if status != reqwest::StatusCode::OK {
            error!("Prometheus query failed: {} - {}", status, body);
            return Err(MetricsError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let value: serde_json::Value = serde_json::from_str(&body)?;
        Ok(MetricsResult(value))
    }
}
