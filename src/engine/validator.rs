//! Reference checks run during phase 2.
//!
//! Member lists are checked in a fixed order: existence, duplicates, emptiness,
//! self-reference. Once every node is resolved, `detect_cycles` walks the
//! combined fallback and member edges.

use super::graph::{ProviderId, ProviderIndex};
use super::node::ProviderNode;
use crate::error::LoggingError;
use std::collections::HashSet;

/// Resolve a provider's member list into handles.
pub fn resolve_references(
    (owner, owner_id): (&str, ProviderId),
    names: &[String],
    required: bool,
    index: &ProviderIndex,
) -> Result<Vec<ProviderId>, LoggingError> {
    let resolved = names
        .iter()
        .map(|name| lookup(owner, name, index))
        .collect::<Result<Vec<_>, _>>()?;

    let mut seen = HashSet::with_capacity(resolved.len());
    for (name, id) in names.iter().zip(&resolved) {
        if !seen.insert(*id) {
            return Err(LoggingError::Configuration(format!(
                "The provider '{name}' is referenced multiple times by provider '{owner}'."
            )));
        }
    }

    if required && resolved.is_empty() {
        return Err(LoggingError::Configuration(format!(
            "The provider '{owner}' does not reference any providers. \
             At least one 'provider1' attribute is required."
        )));
    }

    if resolved.contains(&owner_id) {
        return Err(self_reference(owner));
    }

    Ok(resolved)
}

/// Resolve the optional fallback provider name.
pub fn resolve_fallback(
    (owner, owner_id): (&str, ProviderId),
    name: Option<&str>,
    index: &ProviderIndex,
) -> Result<Option<ProviderId>, LoggingError> {
    let Some(name) = name else {
        return Ok(None);
    };

    let id = lookup(owner, name, index)?;
    if id == owner_id {
        return Err(self_reference(owner));
    }
    Ok(Some(id))
}

/// Reject any cycle through fallback or member edges.
///
/// Such a cycle would recurse without bound the first time an entry reached it.
pub fn detect_cycles(nodes: &[ProviderNode]) -> Result<(), LoggingError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        New,
        OnPath,
        Done,
    }

    fn visit(
        id: ProviderId,
        nodes: &[ProviderNode],
        marks: &mut [Mark],
        path: &mut Vec<ProviderId>,
    ) -> Result<(), LoggingError> {
        marks[id.0] = Mark::OnPath;
        path.push(id);

        for next in nodes[id.0].outgoing() {
            match marks[next.0] {
                Mark::Done => {}
                Mark::New => visit(next, nodes, marks, path)?,
                Mark::OnPath => {
                    let start = path.iter().position(|p| *p == next).unwrap_or(0);
                    let cycle = path[start..]
                        .iter()
                        .chain(std::iter::once(&next))
                        .map(|p| nodes[p.0].name())
                        .collect::<Vec<_>>()
                        .join(" -> ");
                    return Err(LoggingError::Configuration(format!(
                        "Circular provider reference detected: {cycle}."
                    )));
                }
            }
        }

        path.pop();
        marks[id.0] = Mark::Done;
        Ok(())
    }

    let mut marks = vec![Mark::New; nodes.len()];
    let mut path = Vec::new();
    for i in 0..nodes.len() {
        if marks[i] == Mark::New {
            visit(ProviderId(i), nodes, &mut marks, &mut path)?;
        }
    }
    Ok(())
}

fn lookup(owner: &str, name: &str, index: &ProviderIndex) -> Result<ProviderId, LoggingError> {
    index.get(name).ok_or_else(|| {
        LoggingError::Configuration(format!(
            "The provider '{owner}' references provider '{name}', \
             but the referenced provider does not exist."
        ))
    })
}

fn self_reference(owner: &str) -> LoggingError {
    LoggingError::Configuration(format!("The provider '{owner}' references itself."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProviderName;

    fn index(names: &[&str]) -> ProviderIndex {
        let mut index = ProviderIndex::default();
        for (i, name) in names.iter().enumerate() {
            index.insert(ProviderName::new(*name), ProviderId(i));
        }
        index
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_resolves_in_declared_order() {
        let index = index(&["Comp", "A", "B"]);
        let resolved =
            resolve_references(("Comp", ProviderId(0)), &names(&["B", "a"]), true, &index).unwrap();
        assert_eq!(resolved, vec![ProviderId(2), ProviderId(1)]);
    }

    #[test]
    fn test_missing_reference_names_the_target() {
        let index = index(&["Comp"]);
        let err = resolve_references(("Comp", ProviderId(0)), &names(&["Missing"]), true, &index)
            .unwrap_err();
        assert!(err.to_string().contains("'Missing'"));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_duplicate_reference_is_rejected_case_insensitively() {
        let index = index(&["Comp", "A"]);
        let err = resolve_references(("Comp", ProviderId(0)), &names(&["A", "a"]), true, &index)
            .unwrap_err();
        assert!(err.to_string().contains("referenced multiple times"));
    }

    #[test]
    fn test_duplicate_is_reported_before_self_reference() {
        let index = index(&["Comp"]);
        let err =
            resolve_references(("Comp", ProviderId(0)), &names(&["Comp", "Comp"]), true, &index)
                .unwrap_err();
        assert!(err.to_string().contains("referenced multiple times"));
    }

    #[test]
    fn test_empty_list_only_fails_when_required() {
        let index = index(&["Comp"]);
        let err = resolve_references(("Comp", ProviderId(0)), &[], true, &index).unwrap_err();
        assert!(err.to_string().contains("does not reference any providers"));

        assert!(resolve_references(("Leaf", ProviderId(0)), &[], false, &index).unwrap().is_empty());
    }

    #[test]
    fn test_self_reference_is_rejected() {
        let index = index(&["Comp", "A"]);
        let err = resolve_references(("Comp", ProviderId(0)), &names(&["A", "comp"]), true, &index)
            .unwrap_err();
        assert!(err.to_string().contains("references itself"));

        let err = resolve_fallback(("A", ProviderId(1)), Some("A"), &index).unwrap_err();
        assert!(err.to_string().contains("references itself"));
    }

    #[test]
    fn test_fallback_must_exist() {
        let index = index(&["A"]);
        assert_eq!(resolve_fallback(("A", ProviderId(0)), None, &index).unwrap(), None);

        let err = resolve_fallback(("A", ProviderId(0)), Some("Ghost"), &index).unwrap_err();
        assert!(err.to_string().contains("'Ghost'"));
    }
}
