use std::sync::Arc;

use anyhow::{Context, Result};
use kube::Client;
use tracing::{info, warn};

use kube_diagnostic_reporter::{
    build_slack_payload, load_config, render_outcome, send_to_slack, DiagnosticPipeline,
    DiagnosticReporter, GeminiClient, KubeClusterClient, PipelineSettings, PrometheusClient,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cfg = load_config()?;
    info!("namespace = {}, target = {}", cfg.namespace, cfg.selector);

    let client = Client::try_default().await?;

    let cluster = KubeClusterClient::new(client, cfg.namespace.clone())
        .with_container(cfg.container.clone());
    let metrics = PrometheusClient::new(cfg.prometheus_url.clone(), cfg.http_timeout)
        .context("Failed to build Prometheus client")?;
    let backend = GeminiClient::new(
        cfg.genai_api_key.clone(),
        cfg.genai_model.clone(),
        cfg.genai_temperature,
        cfg.http_timeout,
    )
    .context("Failed to build Gemini client")?
    .with_base_url(cfg.genai_base_url.clone());

    let pipeline = DiagnosticPipeline::new(
        Arc::new(cluster),
        Arc::new(metrics),
        DiagnosticReporter::new(Arc::new(backend)),
        PipelineSettings::from_config(&cfg),
    );

    let outcome = pipeline.run().await.context("Target discovery failed")?;
    info!("{}: {}", outcome.target(), outcome.summary_line());

    println!("{}", render_outcome(&outcome, cfg.cluster_name.as_deref()));

    if let Some(webhook_url) = &cfg.slack_webhook_url {
        let payload = build_slack_payload(&outcome, cfg.cluster_name.as_deref());
        if let Err(e) = send_to_slack(webhook_url, &payload, cfg.http_timeout).await {
            warn!("Slack delivery failed: {:#}", e);
        }
    }

    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
