use sift_core::models::{DegradationEvent, DegradationKind, QueryStats};
use sift_observability::{DegradationTracker, QueryLog, QueryLogEntry, RecoveryStatus};

fn event(component: &str, kind: DegradationKind) -> DegradationEvent {
    DegradationEvent::new(component, kind, "timed out", "empty list")
}

fn stats(latency_ms: u64, truncated: bool) -> QueryStats {
    QueryStats {
        latency_ms,
        truncated,
        ..Default::default()
    }
}

#[test]
fn tracker_records_and_recovers() {
    let mut tracker = DegradationTracker::new();
    tracker.record(event("dense_search", DegradationKind::UpstreamTimeout));
    tracker.record(event("dense_search", DegradationKind::UpstreamTimeout));
    tracker.record(event("rerank", DegradationKind::UpstreamFailure));

    assert_eq!(tracker.active_degradations().len(), 3);
    assert_eq!(tracker.count_recent("dense_search", 60), 2);
    assert_eq!(tracker.count_by_kind(DegradationKind::UpstreamFailure), 1);
    assert!(tracker.degraded_duration("dense_search").is_some());

    assert_eq!(tracker.mark_recovered("dense_search"), 2);
    assert_eq!(tracker.active_degradations().len(), 1);
    assert!(tracker.degraded_duration("dense_search").is_none());
    assert!(tracker
        .events()
        .filter(|t| t.event.component == "dense_search")
        .all(|t| t.recovery_status == RecoveryStatus::Recovered && t.recovered_at.is_some()));
}

#[test]
fn tracker_drops_oldest_past_capacity() {
    let mut tracker = DegradationTracker::with_capacity(2);
    tracker.record(event("a", DegradationKind::OrphanChunk));
    tracker.record(event("b", DegradationKind::OrphanChunk));
    tracker.record(event("c", DegradationKind::OrphanChunk));
    let components: Vec<&str> = tracker.events().map(|t| t.event.component.as_str()).collect();
    assert_eq!(components, vec!["b", "c"]);
    assert_eq!(tracker.count_all_recent(60), 2);
}

#[test]
fn query_log_latency_and_rates() {
    let mut log = QueryLog::with_capacity(3);
    log.record(QueryLogEntry::new("q1", stats(10, false), 0));
    log.record(QueryLogEntry::new("q2", stats(20, true), 1));
    log.record(QueryLogEntry::new("q3", stats(30, false), 0));
    log.record(QueryLogEntry::new("q4", stats(40, true), 2));

    assert_eq!(log.count(), 3);
    assert_eq!(log.avg_latency().as_millis(), 30);
    assert_eq!(log.latency_percentile(1.0).as_millis(), 40);
    assert_eq!(log.latency_percentile(0.0).as_millis(), 20);
    assert!((log.truncation_rate() - 2.0 / 3.0).abs() < 1e-9);
    assert!((log.degraded_rate() - 2.0 / 3.0).abs() < 1e-9);
}

#[test]
fn empty_log_is_zero() {
    let log = QueryLog::new();
    assert_eq!(log.avg_latency().as_millis(), 0);
    assert_eq!(log.truncation_rate(), 0.0);
}
