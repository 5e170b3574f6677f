use crate::snapshot::DiagnosticSnapshot;
use crate::types::Collected;

const TEMPLATE: &str = "Analyze the following Kubernetes information:\n\n\
Logs:\n{logs}\n\n\
Metrics:\n{metrics}\n\n\
Events:\n{events}\n\n\
Identify anomalies and suggest corrective actions in concise and brief";

fn slot<T>(value: &Collected<T>, render: impl Fn(&T) -> String) -> String {
    match value {
        Collected::Available(v) => render(v),
        Collected::Unavailable { reason } => format!("[unavailable: {}]", reason),
    }
}

/// Fill the analysis template. Slots are bound by name.
pub fn render_prompt(snapshot: &DiagnosticSnapshot) -> String {
    let logs = slot(&snapshot.logs, |l| l.clone());
    let metrics = slot(&snapshot.metrics, |m| m.to_pretty_string());
    let events = slot(&snapshot.events, |e| e.clone());

    // Substitute in a single pass so slot markers inside collected text stay literal
    let mut out = String::with_capacity(TEMPLATE.len() + logs.len() + metrics.len() + events.len());
    let mut rest = TEMPLATE;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let (value, consumed) = if tail.starts_with("{logs}") {
            (logs.as_str(), "{logs}".len())
        } else if tail.starts_with("{metrics}") {
            (metrics.as_str(), "{metrics}".len())
        } else if tail.starts_with("{events}") {
            (events.as_str(), "{events}".len())
        } else {
            ("{", 1)
        };
        out.push_str(value);
        rest = &tail[consumed..];
    }
    out.push_str(rest);
    out
}
