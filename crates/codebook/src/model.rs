use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One recorded instance of a participant mentioning a code.
///
/// The `reference` text is opaque to the aggregation engine and passed
/// through untouched. Missing fields deserialize to empty strings rather
/// than failing: upstream transcripts are not validated here, so an empty
/// participant simply aggregates as the empty-string identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    /// Participant identifier (e.g., "P07").
    #[serde(default)]
    pub participant: String,

    /// Quoted transcript excerpt supporting the code.
    #[serde(default)]
    pub reference: String,
}

/// Classification of a code within the coding scheme.
///
/// The upstream pipeline tags codes with one of four category strings;
/// anything else collapses to `Unknown` on deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeKind {
    Drivers,
    Strategies,
    Value,
    Governance,
    #[serde(other)]
    Unknown,
}

impl Default for CodeKind {
    fn default() -> Self {
        CodeKind::Unknown
    }
}

/// One codebook row: a hierarchical code name plus the reference records
/// collected for it across all interviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeEntry {
    /// Full path name, segments joined by [`crate::PATH_DELIMITER`].
    /// Unique within a codebook.
    pub name: String,

    /// Code classification.
    #[serde(rename = "type", default)]
    pub kind: CodeKind,

    /// Direct reference records. Only leaf codes normally carry these;
    /// interior codes may carry them but they are ignored by aggregation.
    #[serde(default)]
    pub references: Vec<ReferenceRecord>,
}

/// Name-indexed codebook lookup.
///
/// Deserializes from the upstream JSON shape (a flat list of entries);
/// duplicate names keep the first entry seen.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "Vec<CodeEntry>")]
pub struct Codebook {
    entries: Vec<CodeEntry>,
    index: HashMap<String, usize>,
}

impl Codebook {
    pub fn from_entries(entries: Vec<CodeEntry>) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            index.entry(entry.name.clone()).or_insert(i);
        }
        Self { entries, index }
    }

    /// Find an entry by full path name.
    pub fn get(&self, name: &str) -> Option<&CodeEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All code names, in entry order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn entries(&self) -> &[CodeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<CodeEntry>> for Codebook {
    fn from(entries: Vec<CodeEntry>) -> Self {
        Self::from_entries(entries)
    }
}

/// Scenario name -> candidate code names selected for that scenario.
///
/// Candidates are raw selections from the linking UI; they may contain
/// duplicates, stale names, or redundant ancestor/descendant pairs. The
/// engine's reducer cleans them up.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioTable {
    scenarios: HashMap<String, Vec<String>>,
}

impl ScenarioTable {
    pub fn new(scenarios: HashMap<String, Vec<String>>) -> Self {
        Self { scenarios }
    }

    /// Candidate code names for a scenario, or `None` if the key is absent.
    pub fn candidates(&self, scenario: &str) -> Option<&[String]> {
        self.scenarios.get(scenario).map(|v| v.as_slice())
    }

    pub fn contains(&self, scenario: &str) -> bool {
        self.scenarios.contains_key(scenario)
    }

    pub fn scenarios(&self) -> impl Iterator<Item = &str> {
        self.scenarios.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}
