use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::Event;

const HEADERS: [&str; 5] = ["LAST SEEN", "TYPE", "REASON", "OBJECT", "MESSAGE"];

pub fn event_last_seen(event: &Event) -> Option<DateTime<Utc>> {
    event
        .last_timestamp
        .as_ref()
        .map(|t| t.0)
        .or_else(|| event.event_time.as_ref().map(|t| t.0))
        .or_else(|| event.first_timestamp.as_ref().map(|t| t.0))
        .or_else(|| event.metadata.creation_timestamp.as_ref().map(|t| t.0))
}

fn involved_object(event: &Event) -> String {
    let obj = &event.involved_object;
    let kind = obj.kind.as_deref().unwrap_or("unknown").to_lowercase();
    let name = obj.name.as_deref().unwrap_or("-");
    format!("{}/{}", kind, name)
}

fn event_row(event: &Event) -> [String; 5] {
    let last_seen = event_last_seen(event)
        .map(|t| t.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
        .unwrap_or_else(|| "-".to_string());
    let message = event
        .message
        .as_deref()
        .unwrap_or("")
        .replace('\n', " ");
    let message = match event.count {
        Some(count) if count > 1 => format!("{} (x{})", message.trim_end(), count),
        _ => message.trim_end().to_string(),
    };
    [
        last_seen,
        event.type_.clone().unwrap_or_else(|| "-".to_string()),
        event.reason.clone().unwrap_or_else(|| "-".to_string()),
        involved_object(event),
        message,
    ]
}

/// Render namespace events as a plain-text table, oldest first.
pub fn render_events(events: &[Event], namespace: &str) -> String {
    if events.is_empty() {
        return format!("No events found in {} namespace.", namespace);
    }

    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by_key(|e| event_last_seen(e));

    let rows: Vec<[String; 5]> = sorted.into_iter().map(event_row).collect();

    let mut widths = HEADERS.map(|h| h.len());
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format_row(&HEADERS.map(|h| h.to_string()), &widths));
    for row in &rows {
        lines.push(format_row(row, &widths));
    }
    lines.join("\n")
}

fn format_row(row: &[String; 5], widths: &[usize; 5]) -> String {
    let mut line = String::new();
    for (i, cell) in row.iter().enumerate() {
        if i == row.len() - 1 {
            line.push_str(cell);
        } else {
            line.push_str(&format!("{:<width$}   ", cell, width = widths[i]));
        }
    }
    line.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use k8s_openapi::api::core::v1::ObjectReference;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;

    fn create_test_event(reason: &str, object: &str, message: &str, last_seen: DateTime<Utc>) -> Event {
        Event {
            reason: Some(reason.to_string()),
            message: Some(message.to_string()),
            type_: Some("Normal".to_string()),
            involved_object: ObjectReference {
                kind: Some("Pod".to_string()),
                name: Some(object.to_string()),
                ..Default::default()
            },
            last_timestamp: Some(Time(last_seen)),
            ..Default::default()
        }
    }

    #[test]
    fn test_render_events_empty() {
        assert_eq!(render_events(&[], "default"), "No events found in default namespace.");
    }

    #[test]
    fn test_render_events_orders_oldest_first() {
        let now = Utc::now();
        let events = vec![
            create_test_event("Started", "web-7d9", "Started container web", now),
            create_test_event("Scheduled", "web-7d9", "Successfully assigned default/web-7d9", now - Duration::minutes(2)),
        ];

        let rendered = render_events(&events, "default");
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("LAST SEEN"));
        assert!(lines[0].contains("MESSAGE"));
        assert!(lines[1].contains("Scheduled"));
        assert!(lines[1].contains("pod/web-7d9"));
        assert!(lines[2].contains("Started container web"));
    }

    #[test]
    fn test_render_events_repeat_count_and_missing_fields() {
        let mut event = create_test_event("BackOff", "api-1", "Back-off restarting failed container\n", Utc::now());
        event.count = Some(7);
        event.type_ = Some("Warning".to_string());

        let bare = Event::default();

        let rendered = render_events(&[event, bare], "default");
        assert!(rendered.contains("Back-off restarting failed container (x7)"));
        assert!(rendered.contains("Warning"));
        assert!(rendered.contains("unknown/-"));
    }

    #[test]
    fn test_event_last_seen_fallbacks() {
        let now = Utc::now();
        let mut event = Event::default();
        assert_eq!(event_last_seen(&event), None);

        event.first_timestamp = Some(Time(now - Duration::minutes(5)));
        assert_eq!(event_last_seen(&event), Some(now - Duration::minutes(5)));

        event.last_timestamp = Some(Time(now));
        assert_eq!(event_last_seen(&event), Some(now));
    }
}
