use codelink_codebook::{CodeEntry, CodeKind, Codebook, ReferenceRecord, ScenarioTable, ROOT_NAME};
use codelink_engine::{aggregate_scenario, LinkingError};
use pretty_assertions::assert_eq;
use std::collections::{BTreeSet, HashMap};

fn entry(name: &str, participants: &[&str]) -> CodeEntry {
    CodeEntry {
        name: name.to_string(),
        kind: CodeKind::Unknown,
        references: participants
            .iter()
            .map(|p| ReferenceRecord {
                participant: p.to_string(),
                reference: format!("{p} on {name}"),
            })
            .collect(),
    }
}

fn scenarios(scenario: &str, candidates: &[&str]) -> ScenarioTable {
    let mut map = HashMap::new();
    map.insert(
        scenario.to_string(),
        candidates.iter().map(|c| c.to_string()).collect(),
    );
    ScenarioTable::new(map)
}

#[test]
fn redundant_ancestor_selections_collapse_to_leaves() {
    let codebook = Codebook::from_entries(vec![
        entry("A\\B", &["p1"]),
        entry("A\\B\\C", &["p1", "p2"]),
        entry("A\\D", &["p1"]),
    ]);
    let table = scenarios("flooding", &["A\\B", "A\\B\\C", "A\\D"]);

    let aggregate = aggregate_scenario(&codebook, &table, "flooding").unwrap();

    let selected: Vec<&str> = aggregate
        .occurrences
        .iter()
        .map(|o| o.code_name.as_str())
        .collect();
    assert_eq!(selected, vec!["A\\B\\C", "A\\D"]);
}

#[test]
fn aggregates_roll_up_counts_and_participants() {
    let codebook = Codebook::from_entries(vec![
        entry("A\\B\\C", &["p1", "p2"]),
        entry("A\\D", &["p1"]),
    ]);
    let table = scenarios("flooding", &["A\\B\\C", "A\\D"]);

    let aggregate = aggregate_scenario(&codebook, &table, "flooding").unwrap();

    let root = &aggregate.nodes[ROOT_NAME];
    assert_eq!(root.references_count, 3);
    assert_eq!(root.participants, vec!["p1".to_string(), "p2".to_string()]);

    // Synthesized ancestor carries the same rollup.
    let a = &aggregate.nodes["A"];
    assert_eq!(a.references_count, 3);
    assert_eq!(a.participants, vec!["p1".to_string(), "p2".to_string()]);
    assert_eq!(a.children, vec!["A\\B".to_string(), "A\\D".to_string()]);

    // Leaves report their own direct counts.
    assert_eq!(aggregate.nodes["A\\B\\C"].references_count, 2);
    assert_eq!(aggregate.nodes["A\\D"].references_count, 1);
}

#[test]
fn missing_scenario_key_is_not_found() {
    let codebook = Codebook::from_entries(vec![entry("A", &["p1"])]);
    let table = scenarios("flooding", &["A"]);

    let err = aggregate_scenario(&codebook, &table, "missing-key").unwrap_err();
    match err {
        LinkingError::ScenarioNotFound(key) => assert_eq!(key, "missing-key"),
        other => panic!("expected ScenarioNotFound, got {other}"),
    }
}

#[test]
fn empty_candidate_list_yields_bare_root() {
    let codebook = Codebook::from_entries(vec![entry("A", &["p1"])]);
    let table = scenarios("empty", &[]);

    let aggregate = aggregate_scenario(&codebook, &table, "empty").unwrap();

    assert!(aggregate.occurrences.is_empty());
    assert_eq!(aggregate.nodes.len(), 1);
    let root = &aggregate.nodes[ROOT_NAME];
    assert!(root.children.is_empty());
    assert!(root.participants.is_empty());
    assert_eq!(root.references_count, 0);
}

#[test]
fn deep_shared_ancestor_unions_both_branches() {
    let codebook = Codebook::from_entries(vec![
        entry("X\\Y\\Z1", &["p1", "p2"]),
        entry("X\\Y\\Z2", &["p3"]),
    ]);
    let table = scenarios("s", &["X\\Y\\Z1", "X\\Y\\Z2"]);

    let aggregate = aggregate_scenario(&codebook, &table, "s").unwrap();

    let expected: Vec<String> = ["p1", "p2", "p3"].iter().map(|p| p.to_string()).collect();
    let xy = &aggregate.nodes["X\\Y"];
    assert_eq!(xy.references_count, 3);
    assert_eq!(xy.participants, expected);

    // Single-child pass-through shows the same totals.
    let x = &aggregate.nodes["X"];
    assert_eq!(x.references_count, 3);
    assert_eq!(x.participants, expected);
}

#[test]
fn root_count_conserves_leaf_reference_records() {
    let codebook = Codebook::from_entries(vec![
        entry("A\\B", &["p1", "p1", "p2"]),
        entry("A\\C\\D", &["p3"]),
        entry("E", &["p1", "p4"]),
    ]);
    let table = scenarios("s", &["A\\B", "A\\C\\D", "E"]);

    let aggregate = aggregate_scenario(&codebook, &table, "s").unwrap();

    // 3 + 1 + 2 records across the true leaves, none dropped or doubled.
    assert_eq!(aggregate.nodes[ROOT_NAME].references_count, 6);
}

#[test]
fn participants_are_monotone_along_edges() {
    let codebook = Codebook::from_entries(vec![
        entry("A\\B\\C", &["p1"]),
        entry("A\\B\\D", &["p2"]),
        entry("A\\E", &["p3"]),
    ]);
    let table = scenarios("s", &["A\\B\\C", "A\\B\\D", "A\\E"]);

    let aggregate = aggregate_scenario(&codebook, &table, "s").unwrap();

    for node in aggregate.nodes.values() {
        let parent_set: BTreeSet<&String> = node.participants.iter().collect();
        for child in &node.children {
            let child_set: BTreeSet<&String> =
                aggregate.nodes[child].participants.iter().collect();
            assert!(
                child_set.is_subset(&parent_set),
                "participants of '{child}' exceed those of '{}'",
                node.name
            );
        }
    }
}

#[test]
fn pruned_table_is_exactly_the_reachable_set() {
    let codebook = Codebook::from_entries(vec![
        entry("A\\B", &["p1"]),
        entry("Unselected\\Code", &["p9"]),
    ]);
    let table = scenarios("s", &["A\\B"]);

    let aggregate = aggregate_scenario(&codebook, &table, "s").unwrap();

    // Walk children edges from root and compare with the table keys.
    let mut reachable = BTreeSet::new();
    let mut stack = vec![ROOT_NAME.to_string()];
    while let Some(name) = stack.pop() {
        if reachable.insert(name.clone()) {
            for child in &aggregate.nodes[&name].children {
                stack.push(child.clone());
            }
        }
    }
    let table_names: BTreeSet<String> = aggregate.nodes.keys().cloned().collect();
    assert_eq!(table_names, reachable);
    assert!(!table_names.contains("Unselected\\Code"));
}

#[test]
fn occurrences_follow_selection_order() {
    let codebook = Codebook::from_entries(vec![
        entry("Z", &["p1"]),
        entry("M\\N", &["p2"]),
        entry("B\\C\\D", &["p3", "p4"]),
    ]);
    let table = scenarios("s", &["Z", "M\\N", "B\\C\\D"]);

    let aggregate = aggregate_scenario(&codebook, &table, "s").unwrap();

    let names: Vec<&str> = aggregate
        .occurrences
        .iter()
        .map(|o| o.code_name.as_str())
        .collect();
    assert_eq!(names, vec!["Z", "M\\N", "B\\C\\D"]);
    assert_eq!(
        aggregate
            .occurrences
            .iter()
            .map(|o| o.occurrences)
            .collect::<Vec<_>>(),
        vec![1, 1, 2]
    );
}

#[test]
fn aggregate_serializes_to_stable_json() {
    let codebook = Codebook::from_entries(vec![entry("A", &["p1"])]);
    let table = scenarios("s", &["A"]);

    let aggregate = aggregate_scenario(&codebook, &table, "s").unwrap();
    let json = serde_json::to_value(&aggregate).unwrap();

    assert_eq!(json["occurrences"][0]["code_name"], "A");
    assert_eq!(json["occurrences"][0]["occurrences"], 1);
    assert_eq!(json["nodes"]["root"]["references_count"], 1);
    assert_eq!(json["nodes"]["root"]["children"][0], "A");
}
