use switchyard::test_support::{Journal, descriptor, spy_registry};
use switchyard::{LogEntry, Severity};
use tracing_test::traced_test;

#[traced_test]
#[tokio::test]
async fn test_graph_build_is_logged() {
    let journal = Journal::new();
    spy_registry(&journal)
        .build(vec![descriptor("Spy", "spy", &[])], "Spy")
        .unwrap();

    assert!(logs_contain("Provider graph built"));
}

#[traced_test]
#[tokio::test]
async fn test_fallback_routing_is_logged() {
    let journal = Journal::new();
    let graph = spy_registry(&journal)
        .build(
            vec![
                descriptor("Primary", "spy", &[("fail", "true"), ("fallbackProvider", "Backup")]),
                descriptor("Backup", "spy", &[]),
            ],
            "Primary",
        )
        .unwrap();

    graph
        .log(&LogEntry::new(Severity::Error, "payment declined"))
        .await
        .unwrap();

    assert!(logs_contain("routing entry to fallback provider"));
    assert!(logs_contain("Primary is unavailable"));
}

#[traced_test]
#[tokio::test]
async fn test_member_failure_is_logged_during_fan_out() {
    let journal = Journal::new();
    let graph = spy_registry(&journal)
        .build(
            vec![
                descriptor("Comp", "composite", &[("provider1", "A"), ("provider2", "B")]),
                descriptor("A", "spy", &[("fail", "true")]),
                descriptor("B", "spy", &[]),
            ],
            "Comp",
        )
        .unwrap();

    let _ = graph.log(&LogEntry::new(Severity::Warning, "m")).await;

    assert!(logs_contain("Member provider failed, continuing fan-out"));
}

#[traced_test]
#[tokio::test]
async fn test_tracing_provider_re_emits_entries() {
    let graph = switchyard::ProviderRegistry::with_builtin_providers()
        .build(vec![descriptor("Console", "tracing", &[("target", "audit")])], "Console")
        .unwrap();

    graph
        .log(&LogEntry::new(Severity::Critical, "replica lag exceeded").with_source("db"))
        .await
        .unwrap();

    assert!(logs_contain("replica lag exceeded"));
    assert!(logs_contain("audit"));
}
