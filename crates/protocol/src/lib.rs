//! Wire contract for the scenario-linking service.
//!
//! Transport-agnostic request/response DTOs: the surrounding system owns
//! routing, CORS, and file loading; this crate only fixes the JSON shapes
//! exchanged at the boundary and converts engine output into them. Field
//! spellings match what dashboard clients already consume
//! (`scenario_children`, `references_count`).

use anyhow::Result;
use codelink_engine::{LinkingError, ScenarioAggregate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const LINKING_SCHEMA_VERSION: u32 = 1;

/// Request body for scenario code aggregation.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct ScenarioRequest {
    pub scenario: String,
}

/// One entry of the per-leaf occurrence summary.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct CodeOccurrenceDto {
    pub code_name: String,
    pub occurrences: usize,
}

/// One reachable node of the aggregated scenario tree.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct ScenarioNodeRecord {
    pub name: String,
    pub scenario_children: Vec<String>,
    pub participants: Vec<String>,
    pub references_count: usize,
}

/// Success response: occurrence summary in selection order plus every
/// reachable node (synthetic root included), ordered by name.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct ScenarioCodesResponse {
    pub occurrences: Vec<CodeOccurrenceDto>,
    pub participants: Vec<ScenarioNodeRecord>,
}

/// Failure response shared by all endpoints.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    pub scenario: Option<String>,
}

impl From<ScenarioAggregate> for ScenarioCodesResponse {
    fn from(aggregate: ScenarioAggregate) -> Self {
        let occurrences = aggregate
            .occurrences
            .into_iter()
            .map(|o| CodeOccurrenceDto {
                code_name: o.code_name,
                occurrences: o.occurrences,
            })
            .collect();
        // BTreeMap order keeps the node list byte-stable per input.
        let participants = aggregate
            .nodes
            .into_values()
            .map(|node| ScenarioNodeRecord {
                name: node.name,
                scenario_children: node.children,
                participants: node.participants,
                references_count: node.references_count,
            })
            .collect();
        Self {
            occurrences,
            participants,
        }
    }
}

impl From<&LinkingError> for ErrorEnvelope {
    fn from(err: &LinkingError) -> Self {
        let (code, scenario) = match err {
            LinkingError::ScenarioNotFound(key) => ("scenario_not_found", Some(key.clone())),
            LinkingError::DataConsistency(_) => ("data_consistency", None),
        };
        Self {
            code: code.to_string(),
            message: err.to_string(),
            scenario,
        }
    }
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}
