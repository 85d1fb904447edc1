use crate::error::{LinkingError, Result};
use crate::reduce::reduce_code_set;
use crate::tree::ScenarioTree;
use codelink_codebook::{Codebook, ScenarioTable, ROOT_NAME};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Aggregated view of one reachable node in the scenario tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedNode {
    /// Full path name ("root" for the synthetic root).
    pub name: String,

    /// Immediate child names, sorted.
    pub children: Vec<String>,

    /// Distinct participants touching this node or any descendant, sorted.
    pub participants: Vec<String>,

    /// Total reference records in this node's subtree. Not deduplicated
    /// by participant: every record counts once.
    pub references_count: usize,
}

/// Per-leaf occurrence summary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeOccurrence {
    pub code_name: String,
    pub occurrences: usize,
}

/// Result of aggregating one scenario: the occurrence summary for the
/// minimal leaf selection (in selection order) and the pruned node table,
/// containing exactly the nodes reachable from root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioAggregate {
    pub occurrences: Vec<CodeOccurrence>,
    pub nodes: BTreeMap<String, AggregatedNode>,
}

/// Aggregate the codes selected for `scenario` into a reachable, pruned
/// scenario tree with bottom-up participant and reference-count rollups.
///
/// Pure function of its inputs: builds every structure fresh and returns
/// no partial result on error.
pub fn aggregate_scenario(
    codebook: &Codebook,
    scenarios: &ScenarioTable,
    scenario: &str,
) -> Result<ScenarioAggregate> {
    let candidates = scenarios
        .candidates(scenario)
        .ok_or_else(|| LinkingError::ScenarioNotFound(scenario.to_string()))?;

    let known_names: HashSet<&str> = codebook.names().collect();
    let leaves = reduce_code_set(candidates, &known_names);

    let tree = ScenarioTree::build(&leaves, codebook);
    let stats = collect_references(&tree)?;
    let nodes = prune_reachable(&tree, &stats)?;

    let occurrences = leaves
        .iter()
        .map(|leaf| {
            let occurrences = nodes
                .get(leaf)
                .map(|node| node.references_count)
                .ok_or_else(|| {
                    LinkingError::DataConsistency(format!(
                        "leaf '{leaf}' missing from the pruned node table"
                    ))
                })?;
            Ok(CodeOccurrence {
                code_name: leaf.clone(),
                occurrences,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    log::debug!(
        "aggregated scenario '{}': {} leaves, {} reachable nodes, {} references at root",
        scenario,
        occurrences.len(),
        nodes.len(),
        nodes.get(ROOT_NAME).map(|n| n.references_count).unwrap_or(0)
    );

    Ok(ScenarioAggregate { occurrences, nodes })
}

#[derive(Debug)]
struct NodeStats {
    participants: BTreeSet<String>,
    references_count: usize,
}

enum Frame {
    Enter(String),
    Exit(String),
}

/// Bottom-up rollup over the tree, children before parents.
///
/// Iterative post-order with an explicit stack; `on_path` tracks the
/// current root-to-node path so any back edge (including a node listing
/// itself as a child) is reported instead of recursed into.
fn collect_references(tree: &ScenarioTree) -> Result<HashMap<String, NodeStats>> {
    let mut stats: HashMap<String, NodeStats> = HashMap::with_capacity(tree.node_count());
    let mut on_path: HashSet<String> = HashSet::new();
    let mut stack = vec![Frame::Enter(ROOT_NAME.to_string())];

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter(name) => {
                if stats.contains_key(&name) {
                    continue;
                }
                let node = tree.get(&name).ok_or_else(|| {
                    LinkingError::DataConsistency(format!(
                        "node '{name}' is listed as a child but missing from the tree"
                    ))
                })?;
                if !on_path.insert(name.clone()) {
                    return Err(LinkingError::DataConsistency(format!(
                        "cycle detected at node '{name}'"
                    )));
                }
                stack.push(Frame::Exit(name.clone()));
                for child in &node.children {
                    if *child == name {
                        return Err(LinkingError::DataConsistency(format!(
                            "node '{name}' lists itself as a child"
                        )));
                    }
                    if on_path.contains(child) {
                        return Err(LinkingError::DataConsistency(format!(
                            "cycle detected between '{name}' and '{child}'"
                        )));
                    }
                    stack.push(Frame::Enter(child.clone()));
                }
            }
            Frame::Exit(name) => {
                on_path.remove(&name);
                let node = tree.get(&name).ok_or_else(|| {
                    LinkingError::DataConsistency(format!(
                        "node '{name}' disappeared during traversal"
                    ))
                })?;

                let mut participants = BTreeSet::new();
                let mut references_count = 0;
                if node.children.is_empty() {
                    // True leaf: distinct participants, raw record count.
                    for record in &node.references {
                        participants.insert(record.participant.clone());
                    }
                    references_count = node.references.len();
                } else {
                    // Interior node: children only; direct references
                    // (if the codebook carried any) do not contribute.
                    for child in &node.children {
                        let child_stats = stats.get(child).ok_or_else(|| {
                            LinkingError::DataConsistency(format!(
                                "child '{child}' of '{name}' was not aggregated"
                            ))
                        })?;
                        participants.extend(child_stats.participants.iter().cloned());
                        references_count += child_stats.references_count;
                    }
                }
                stats.insert(
                    name,
                    NodeStats {
                        participants,
                        references_count,
                    },
                );
            }
        }
    }

    Ok(stats)
}

/// Keep only nodes reachable from root by following children edges.
///
/// The accumulator is allocated fresh per call; nothing is shared across
/// invocations.
fn prune_reachable(
    tree: &ScenarioTree,
    stats: &HashMap<String, NodeStats>,
) -> Result<BTreeMap<String, AggregatedNode>> {
    let mut pruned = BTreeMap::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut stack = vec![ROOT_NAME.to_string()];

    while let Some(name) = stack.pop() {
        if !visited.insert(name.clone()) {
            continue;
        }
        let node = tree.get(&name).ok_or_else(|| {
            LinkingError::DataConsistency(format!(
                "node '{name}' is listed as a child but missing from the tree"
            ))
        })?;
        let node_stats = stats.get(&name).ok_or_else(|| {
            LinkingError::DataConsistency(format!("node '{name}' was not aggregated"))
        })?;

        pruned.insert(
            name.clone(),
            AggregatedNode {
                name: node.name.clone(),
                children: node.children.iter().cloned().collect(),
                participants: node_stats.participants.iter().cloned().collect(),
                references_count: node_stats.references_count,
            },
        );
        for child in &node.children {
            stack.push(child.clone());
        }
    }

    Ok(pruned)
}
