use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tracing::error;

use crate::report::{report_title, RunOutcome};
use crate::types::SlackPayload;

// Slack rejects section text longer than 3000 characters
const MAX_SECTION_CHARS: usize = 2900;

fn truncate_for_section(text: &str) -> String {
    if text.chars().count() <= MAX_SECTION_CHARS {
        return text.to_string();
    }
    let mut out: String = text.chars().take(MAX_SECTION_CHARS).collect();
    out.push_str("\n…(truncated)");
    out
}

pub fn build_slack_payload(outcome: &RunOutcome, cluster_name: Option<&str>) -> SlackPayload {
    let mut blocks: Vec<serde_json::Value> = Vec::new();
    blocks.push(serde_json::json!({
        "type": "header",
        "text": {"type": "plain_text", "text": report_title(cluster_name)}
    }));

    let mut context = format!("Target: `{}`", outcome.target());
    if let Some(phase) = outcome.phase() {
        context.push_str(&format!("\nPhase: {}", phase));
    }
    if let Some(snapshot) = outcome.snapshot() {
        context.push_str(&format!(
            "\nCollected at: {}",
            snapshot.collected_at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
        ));
    }
    blocks.push(serde_json::json!({
        "type": "section",
        "text": {"type": "mrkdwn", "text": context}
    }));

    let missing = outcome.missing_inputs();
    if !missing.is_empty() {
        let lines: Vec<String> = missing
            .iter()
            .map(|m| format!("• *{}*: {}", m.input, m.reason))
            .collect();
        blocks.push(serde_json::json!({
            "type": "section",
            "text": {"type": "mrkdwn", "text": truncate_for_section(&format!("*Missing inputs*\n{}", lines.join("\n")))}
        }));
    }

    let body = match outcome.report() {
        Some(report) => format!("*Analysis ({})*\n{}", report.model, report.text.trim_end()),
        None => format!("*{}*", outcome.summary_line()),
    };
    blocks.push(serde_json::json!({
        "type": "section",
        "text": {"type": "mrkdwn", "text": truncate_for_section(&body)}
    }));

    SlackPayload {
        text: Some(format!("{}: {}", outcome.target(), outcome.summary_line())),
        blocks,
    }
}

pub async fn send_to_slack(webhook_url: &str, payload: &SlackPayload, timeout: Duration) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to build Slack HTTP client")?;
    let res = client
        .post(webhook_url)
        .json(payload)
        .send()
        .await
        .context("Failed to send Slack request")?;
    if !res.status().is_success() {
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        error!("Slack webhook failed: {} - {}", status, body);
        return Err(anyhow!("Slack webhook returned non-success status"));
    }
    Ok(())
}
