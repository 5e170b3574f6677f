use criterion::{black_box, criterion_group, criterion_main, Criterion};
use k8s_openapi::api::core::v1::{Event, ObjectReference};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use kube_diagnostic_reporter::kubernetes::render_events;
use kube_diagnostic_reporter::{assemble, render_prompt, Collected, MetricsResult, WorkloadRef};

fn prompt_rendering_benchmark(c: &mut Criterion) {
    let logs: String = (0..5_000)
        .map(|i| format!("2024-05-01T10:00:{:02}Z INFO request {} served in 12ms\n", i % 60, i))
        .collect();
    let result: Vec<serde_json::Value> = (0..200)
        .map(|i| serde_json::json!({"metric": {"pod": format!("web-{}", i)}, "value": [1714557600.0, "0.0123"]}))
        .collect();
    let snapshot = assemble(
        WorkloadRef::new("web-7d9", "default").unwrap(),
        Collected::Available(logs),
        Collected::Available("LAST SEEN   TYPE   REASON   OBJECT   MESSAGE".to_string()),
        Collected::Available(MetricsResult(serde_json::json!({
            "status": "success",
            "data": {"resultType": "vector", "result": result}
        }))),
    );

    c.bench_function("render_prompt", |b| {
        b.iter(|| black_box(render_prompt(black_box(&snapshot))))
    });
}

fn event_rendering_benchmark(c: &mut Criterion) {
    let now = chrono::Utc::now();
    let events: Vec<Event> = (0..500)
        .map(|i| Event {
            reason: Some("BackOff".to_string()),
            message: Some(format!("Back-off restarting failed container {}", i)),
            type_: Some("Warning".to_string()),
            count: Some(i % 10),
            involved_object: ObjectReference {
                kind: Some("Pod".to_string()),
                name: Some(format!("web-{}", i)),
                ..Default::default()
            },
            last_timestamp: Some(Time(now - chrono::Duration::seconds(i as i64))),
            ..Default::default()
        })
        .collect();

    c.bench_function("render_events", |b| {
        b.iter(|| black_box(render_events(black_box(&events), "default")))
    });
}

criterion_group!(benches, prompt_rendering_benchmark, event_rendering_benchmark);
criterion_main!(benches);
