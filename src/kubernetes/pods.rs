use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::Pod;

use crate::error::DiscoveryError;
use crate::types::{PodPhase, TargetSelector, WorkloadRef};

/// Raw phase string as reported by the control plane
pub fn raw_phase(pod: &Pod) -> Option<&str> {
    pod.status
        .as_ref()
        .and_then(|s| s.phase.as_ref())
        .map(|s| s.as_str())
}

/// Phase of the pod, limited to the closed set of known phases
pub fn parse_pod_phase(pod: &Pod) -> Result<PodPhase, DiscoveryError> {
    let phase = raw_phase(pod).unwrap_or("");
    phase.parse().map_err(|phase| DiscoveryError::UnrecognizedPhase {
        name: pod.metadata.name.clone().unwrap_or_default(),
        phase,
    })
}

pub fn pod_status_time(pod: &Pod) -> Option<DateTime<Utc>> {
    // Prefer status.startTime, fallback to metadata.creationTimestamp
    if let Some(st) = pod.status.as_ref().and_then(|s| s.start_time.as_ref()) {
        return Some(st.0);
    }
    pod.metadata
        .creation_timestamp
        .as_ref()
        .map(|t| t.0)
}

/// Pick the running pod that was scheduled last.
///
/// The listing order is irrelevant: candidates are ranked by start time and
/// equal start times fall back to the lexicographically smallest name.
pub fn choose_target(
    pods: &[Pod],
    namespace: &str,
    selector: &TargetSelector,
) -> Result<WorkloadRef, DiscoveryError> {
    let best = pods
        .iter()
        .filter(|pod| raw_phase(pod) == Some("Running"))
        .filter_map(|pod| {
            let name = pod.metadata.name.as_deref().filter(|n| !n.is_empty())?;
            Some((pod_status_time(pod), name))
        })
        .max_by(|(a_time, a_name), (b_time, b_name)| {
            a_time.cmp(b_time).then_with(|| b_name.cmp(a_name))
        });

    match best {
        Some((_, name)) => WorkloadRef::new(name, namespace),
        None => Err(DiscoveryError::NoCandidates {
            namespace: namespace.to_string(),
            selector: selector.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use k8s_openapi::api::core::v1::PodStatus;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, Time};

    fn create_test_pod(name: &str, phase: &str, start_time: DateTime<Utc>) -> Pod {
        Pod {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some("default".to_string()),
                creation_timestamp: Some(Time(start_time)),
                ..Default::default()
            },
            status: Some(PodStatus {
                phase: Some(phase.to_string()),
                start_time: Some(Time(start_time)),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_choose_target_picks_most_recent_running_pod() {
        let now = Utc::now();
        let pods = vec![
            create_test_pod("web-old", "Running", now - Duration::minutes(30)),
            create_test_pod("web-new", "Running", now - Duration::minutes(1)),
            create_test_pod("web-pending", "Pending", now),
            create_test_pod("web-mid", "Running", now - Duration::minutes(10)),
        ];

        let target = choose_target(&pods, "default", &TargetSelector::MostRecentlyScheduled).unwrap();
        assert_eq!(target.name(), "web-new");
        assert_eq!(target.namespace(), "default");
    }

    #[test]
    fn test_choose_target_ignores_listing_order() {
        let now = Utc::now();
        let mut pods = vec![
            create_test_pod("b", "Running", now),
            create_test_pod("a", "Running", now),
            create_test_pod("c", "Running", now - Duration::minutes(5)),
        ];

        let first = choose_target(&pods, "default", &TargetSelector::MostRecentlyScheduled).unwrap();
        pods.reverse();
        let second = choose_target(&pods, "default", &TargetSelector::MostRecentlyScheduled).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.name(), "a");
    }

    #[test]
    fn test_choose_target_falls_back_to_creation_timestamp() {
        let now = Utc::now();
        let mut newer = create_test_pod("newer", "Running", now);
        newer.status.as_mut().unwrap().start_time = None;
        let older = create_test_pod("older", "Running", now - Duration::hours(1));

        let target = choose_target(&[older, newer], "default", &TargetSelector::MostRecentlyScheduled).unwrap();
        assert_eq!(target.name(), "newer");
    }

    #[test]
    fn test_choose_target_without_running_pods() {
        let now = Utc::now();
        let pods = vec![
            create_test_pod("job-1", "Succeeded", now),
            create_test_pod("job-2", "Failed", now),
        ];

        let result = choose_target(&pods, "batch", &TargetSelector::Labels("app=job".to_string()));
        match result {
            Err(DiscoveryError::NoCandidates { namespace, selector }) => {
                assert_eq!(namespace, "batch");
                assert!(selector.contains("app=job"));
            }
            other => panic!("expected NoCandidates, got {:?}", other),
        }

        let empty = choose_target(&[], "default", &TargetSelector::MostRecentlyScheduled);
        assert!(matches!(empty, Err(DiscoveryError::NoCandidates { .. })));
    }

    #[test]
    fn test_parse_pod_phase() {
        let pod = create_test_pod("web-7d9", "Running", Utc::now());
        assert_eq!(parse_pod_phase(&pod).unwrap(), PodPhase::Running);

        let mut odd = create_test_pod("web-7d9", "Evicted", Utc::now());
        match parse_pod_phase(&odd) {
            Err(DiscoveryError::UnrecognizedPhase { name, phase }) => {
                assert_eq!(name, "web-7d9");
                assert_eq!(phase, "Evicted");
            }
            other => panic!("expected UnrecognizedPhase, got {:?}", other),
        }

        odd.status = None;
        assert!(matches!(parse_pod_phase(&odd), Err(DiscoveryError::UnrecognizedPhase { .. })));
    }
}
