use proptest::prelude::*;
use switchyard::domain::ProviderDescriptor;
use switchyard::test_support::{Journal, descriptor, spy_registry};
use switchyard::{LogEntry, LoggingError, Severity};

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

fn severity() -> impl Strategy<Value = Severity> {
    prop::sample::select(Severity::ALL.to_vec())
}

/// Leaves `L0..Ln` followed by composites `C0..Cm`; each composite only
/// references nodes declared before it, so the graph is acyclic.
fn acyclic_configuration() -> impl Strategy<Value = Vec<ProviderDescriptor>> {
    (1usize..5, prop::collection::vec(prop::collection::vec(any::<prop::sample::Index>(), 1..4), 0..4))
        .prop_map(|(leaves, composites)| {
            let mut names: Vec<String> = (0..leaves).map(|i| format!("L{i}")).collect();
            let mut descriptors: Vec<ProviderDescriptor> =
                names.iter().map(|n| descriptor(n, "spy", &[])).collect();

            for (c, picks) in composites.into_iter().enumerate() {
                let mut members: Vec<String> = Vec::new();
                for pick in picks {
                    let name = pick.get(&names).clone();
                    if !members.contains(&name) {
                        members.push(name);
                    }
                }
                let attrs: Vec<(String, String)> = members
                    .into_iter()
                    .enumerate()
                    .map(|(i, m)| (format!("provider{}", i + 1), m))
                    .collect();
                let name = format!("C{c}");
                descriptors.push(ProviderDescriptor::new(name.as_str(), "composite", attrs));
                names.push(name);
            }
            descriptors
        })
}

proptest! {
    #[test]
    fn prop_every_reference_resolves(descriptors in acyclic_configuration()) {
        let journal = Journal::new();
        let default = descriptors.last().unwrap().name.clone();
        let graph = spy_registry(&journal).build(descriptors.clone(), &default).unwrap();

        let names: Vec<String> = descriptors.iter().map(|d| d.name.clone()).collect();
        for node in graph.topology() {
            for member in &node.members {
                prop_assert!(names.contains(member));
            }
        }
    }

    #[test]
    fn prop_unknown_reference_never_builds(
        descriptors in acyclic_configuration(),
        ghost in "[A-Z][a-z]{3,8}",
    ) {
        let journal = Journal::new();
        let mut descriptors = descriptors;
        descriptors.push(descriptor("Dangling", "composite", &[("provider1", format!("Ghost{ghost}").as_str())]));

        let err = spy_registry(&journal).build(descriptors, "Dangling").unwrap_err();
        prop_assert!(err.to_string().contains(&format!("Ghost{ghost}")), "unexpected error: {}", err);
    }

    #[test]
    fn prop_build_is_idempotent(descriptors in acyclic_configuration()) {
        let journal = Journal::new();
        let registry = spy_registry(&journal);
        let default = descriptors[0].name.clone();

        let first = registry.build(descriptors.clone(), &default).unwrap();
        let second = registry.build(descriptors, &default).unwrap();
        prop_assert_eq!(first.topology(), second.topology());
    }

    #[test]
    fn prop_single_member_is_transparent(fail in any::<bool>(), id in "[a-z0-9]{1,12}") {
        let journal = Journal::new();
        let fail = fail.to_string();
        let graph = spy_registry(&journal)
            .build(
                vec![
                    descriptor("Comp", "composite", &[("provider1", "Leaf")]),
                    descriptor("Leaf", "spy", &[("fail", fail.as_str()), ("returns", id.as_str())]),
                ],
                "Comp",
            )
            .unwrap();
        let entry = LogEntry::new(Severity::Error, "m");

        let through_composite = block_on(graph.log(&entry));
        let direct = block_on(graph.log_to("Leaf", &entry));

        match (through_composite, direct) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(LoggingError::Transport(a)), Err(LoggingError::Transport(b))) => prop_assert_eq!(a, b),
            (a, b) => prop_assert!(false, "composite gave {:?}, member gave {:?}", a, b),
        }
    }

    #[test]
    fn prop_fan_out_invokes_each_member_once_in_order(failures in prop::collection::vec(any::<bool>(), 2..8)) {
        let journal = Journal::new();
        let members: Vec<String> = (0..failures.len()).map(|i| format!("M{i}")).collect();

        let mut descriptors = vec![ProviderDescriptor::new(
            "Comp",
            "composite",
            members
                .iter()
                .enumerate()
                .map(|(i, m)| (format!("provider{}", i + 1), m.clone())),
        )];
        for (name, fail) in members.iter().zip(&failures) {
            descriptors.push(descriptor(name, "spy", &[("fail", fail.to_string().as_str())]));
        }
        let graph = spy_registry(&journal).build(descriptors, "Comp").unwrap();

        let result = block_on(graph.log(&LogEntry::new(Severity::Critical, "m")));

        prop_assert_eq!(journal.order(), members);
        let failed = failures.iter().filter(|f| **f).count();
        match result {
            Ok(id) => {
                prop_assert_eq!(failed, 0);
                prop_assert_eq!(id, None);
            }
            Err(err @ LoggingError::Aggregate(_)) => prop_assert_eq!(err.inner_errors().len(), failed),
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }

    #[test]
    fn prop_threshold_gates_core_logic(threshold in severity(), level in severity()) {
        let journal = Journal::new();
        let graph = spy_registry(&journal)
            .build(vec![descriptor("Leaf", "spy", &[("threshold", threshold.as_str())])], "Leaf")
            .unwrap();

        block_on(graph.log(&LogEntry::new(level, "m"))).unwrap();

        prop_assert_eq!(journal.count_for("Leaf") == 1, level >= threshold);
    }
}
