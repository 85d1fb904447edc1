use codelink_codebook::{Codebook, ReferenceRecord, PATH_DELIMITER, ROOT_NAME};
use std::collections::{BTreeSet, HashMap};

/// One node of a scenario tree.
///
/// Interior nodes synthesized from path prefixes carry no references;
/// nodes backed by a codebook entry carry that entry's reference records,
/// which only matter when the node ends up as a true leaf.
#[derive(Debug, Clone)]
pub(crate) struct TreeNode {
    pub name: String,
    pub children: BTreeSet<String>,
    pub references: Vec<ReferenceRecord>,
}

impl TreeNode {
    fn new(name: &str, codebook: &Codebook) -> Self {
        let references = codebook
            .get(name)
            .map(|entry| entry.references.clone())
            .unwrap_or_default();
        Self {
            name: name.to_string(),
            children: BTreeSet::new(),
            references,
        }
    }
}

/// Arena of scenario-tree nodes, keyed by full path name.
///
/// Built fresh per aggregation request; edges always point from a path
/// prefix to the same path one segment longer, so the structure is a tree
/// under normal construction.
#[derive(Debug, Default)]
pub(crate) struct ScenarioTree {
    nodes: HashMap<String, TreeNode>,
}

impl ScenarioTree {
    /// Expand a minimal leaf selection into the implied ancestor tree and
    /// attach the synthetic root.
    ///
    /// For a leaf `s1\..\sk`, every adjacent prefix pair `(s1..si,
    /// s1..si+1)` becomes a parent/child edge. Registration is idempotent
    /// and leaves sharing an ancestor path merge at that ancestor. The
    /// root's children are the distinct first segments of the leaves.
    pub fn build(leaves: &[String], codebook: &Codebook) -> Self {
        let mut tree = Self::default();
        let delimiter = PATH_DELIMITER.to_string();

        for leaf in leaves {
            tree.ensure_node(leaf, codebook);
            let segments: Vec<&str> = leaf.split(PATH_DELIMITER).collect();
            for i in 1..segments.len() {
                let parent = segments[..i].join(&delimiter);
                let child = segments[..i + 1].join(&delimiter);
                tree.ensure_node(&parent, codebook);
                tree.ensure_node(&child, codebook);
                tree.add_child(&parent, child);
            }
        }

        let mut root = TreeNode {
            name: ROOT_NAME.to_string(),
            children: BTreeSet::new(),
            references: Vec::new(),
        };
        for leaf in leaves {
            if let Some(first) = leaf.split(PATH_DELIMITER).next() {
                if !first.is_empty() {
                    root.children.insert(first.to_string());
                }
            }
        }
        tree.nodes.insert(ROOT_NAME.to_string(), root);

        tree
    }

    fn ensure_node(&mut self, name: &str, codebook: &Codebook) {
        if !self.nodes.contains_key(name) {
            self.nodes
                .insert(name.to_string(), TreeNode::new(name, codebook));
        }
    }

    fn add_child(&mut self, parent: &str, child: String) {
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.insert(child);
        }
    }

    pub fn get(&self, name: &str) -> Option<&TreeNode> {
        self.nodes.get(name)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Test-only constructor for malformed shapes the builder cannot
    /// produce (cycle handling is exercised through this).
    #[cfg(test)]
    pub fn from_nodes(nodes: Vec<TreeNode>) -> Self {
        Self {
            nodes: nodes.into_iter().map(|n| (n.name.clone(), n)).collect(),
        }
    }
}
