use switchyard::test_support::{Journal, descriptor, spy_registry};
use switchyard::{LogEntry, LoggingError, ProviderGraph, Severity};

fn primary_with_backup(journal: &std::sync::Arc<Journal>, primary: &[(&str, &str)]) -> ProviderGraph {
    let mut attrs = vec![("fallbackProvider", "Backup")];
    attrs.extend_from_slice(primary);
    spy_registry(journal)
        .build(
            vec![
                descriptor("Primary", "spy", &attrs),
                descriptor("Backup", "spy", &[("returns", "backup-7")]),
            ],
            "Primary",
        )
        .unwrap()
}

#[tokio::test]
async fn test_failure_report_then_original_entry_reach_fallback() {
    let journal = Journal::new();
    let graph = primary_with_backup(&journal, &[("fail", "true")]);
    let original = LogEntry::new(Severity::Warning, "card declined").with_source("billing");

    let id = graph.log(&original).await.unwrap();

    assert_eq!(id.as_deref(), Some("backup-7"));
    assert_eq!(journal.order(), vec!["Primary", "Backup", "Backup"]);

    let received = journal.entries_for("Backup");
    let report = &received[0];
    assert_eq!(report.severity(), Severity::Error);
    assert_eq!(report.source(), Some("Primary"));
    assert!(report.message().starts_with("Logging to provider 'Primary' failed"));
    assert!(report.message().contains("Primary is unavailable"));
    assert_eq!(report.exception().unwrap().type_name, "TransportError");

    assert_eq!(received[1], original);
}

#[tokio::test]
async fn test_healthy_primary_does_not_touch_fallback() {
    let journal = Journal::new();
    let graph = primary_with_backup(&journal, &[("returns", "primary-1")]);

    let id = graph.log(&LogEntry::new(Severity::Error, "m")).await.unwrap();

    assert_eq!(id.as_deref(), Some("primary-1"));
    assert_eq!(journal.count_for("Backup"), 0);
}

#[tokio::test]
async fn test_runtime_failure_and_recovery() {
    let journal = Journal::new();
    let graph = primary_with_backup(&journal, &[]);
    let entry = LogEntry::new(Severity::Error, "m");

    journal.fail("primary");
    graph.log(&entry).await.unwrap();
    assert_eq!(journal.count_for("Backup"), 2);

    journal.recover("Primary");
    journal.clear();
    graph.log(&entry).await.unwrap();
    assert_eq!(journal.order(), vec!["Primary"]);
}

#[tokio::test]
async fn test_fallback_failure_reaches_caller() {
    let journal = Journal::new();
    let graph = primary_with_backup(&journal, &[("fail", "true")]);
    journal.fail("Backup");

    let err = graph.log(&LogEntry::new(Severity::Error, "m")).await.unwrap_err();

    assert!(matches!(err, LoggingError::Transport(ref m) if m == "Backup is unavailable"));
    assert_eq!(journal.order(), vec!["Primary", "Backup"]);
}

#[tokio::test]
async fn test_fallback_threshold_still_applies_to_original_entry() {
    let journal = Journal::new();
    let graph = spy_registry(&journal)
        .build(
            vec![
                descriptor("Primary", "spy", &[("fail", "true"), ("fallbackProvider", "Backup")]),
                descriptor("Backup", "spy", &[("threshold", "Error")]),
            ],
            "Primary",
        )
        .unwrap();

    graph
        .log(&LogEntry::new(Severity::Information, "low"))
        .await
        .unwrap();

    let received = journal.entries_for("Backup");
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].severity(), Severity::Error);
}

#[tokio::test]
async fn test_composite_aggregate_is_routed_to_its_fallback() {
    let journal = Journal::new();
    let graph = spy_registry(&journal)
        .build(
            vec![
                descriptor(
                    "Comp",
                    "composite",
                    &[("provider1", "A"), ("provider2", "B"), ("fallbackProvider", "Backup")],
                ),
                descriptor("A", "spy", &[("fail", "true")]),
                descriptor("B", "spy", &[]),
                descriptor("Backup", "spy", &[]),
            ],
            "Comp",
        )
        .unwrap();

    graph.log(&LogEntry::new(Severity::Error, "m")).await.unwrap();

    assert_eq!(journal.order(), vec!["A", "B", "Backup", "Backup"]);
    let report = &journal.entries_for("Backup")[0];
    assert_eq!(report.exception().unwrap().type_name, "AggregateError");
}

#[tokio::test]
async fn test_member_fallback_prevents_aggregate() {
    let journal = Journal::new();
    let graph = spy_registry(&journal)
        .build(
            vec![
                descriptor("Comp", "composite", &[("provider1", "A"), ("provider2", "B")]),
                descriptor("A", "spy", &[("fail", "true"), ("fallbackProvider", "Backup")]),
                descriptor("B", "spy", &[]),
                descriptor("Backup", "spy", &[]),
            ],
            "Comp",
        )
        .unwrap();

    assert!(graph.log(&LogEntry::new(Severity::Error, "m")).await.is_ok());
    assert_eq!(journal.order(), vec!["A", "Backup", "Backup", "B"]);
}
