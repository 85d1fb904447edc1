//! # CodeLink Engine
//!
//! Hierarchical code aggregation for scenario linking: which codes were
//! referenced, by whom, and how often, for a given scenario's code
//! selection.
//!
//! ## Pipeline
//!
//! ```text
//! Codebook + ScenarioTable
//!     │
//!     ├──> Reducer (reduce module)
//!     │      ├─ Drop candidates missing from the codebook
//!     │      └─ Drop candidates contained in another candidate
//!     │
//!     ├──> Scenario Tree (tree module)
//!     │      ├─ Nodes: codes, keyed by full path name
//!     │      ├─ Synthesized ancestors for every path prefix
//!     │      └─ Synthetic root above all top-level segments
//!     │
//!     └──> Aggregation (aggregate module)
//!            ├─ Bottom-up: union participants, sum reference counts
//!            ├─ Prune to the subtree reachable from root
//!            └─ Emit per-leaf occurrence summary + node table
//! ```
//!
//! Every invocation builds its tree fresh from the immutable inputs and
//! discards it with the result; there is no cross-request state.

mod aggregate;
mod error;
mod reduce;
mod tree;

pub use aggregate::{aggregate_scenario, AggregatedNode, CodeOccurrence, ScenarioAggregate};
pub use error::{LinkingError, Result};
pub use reduce::reduce_code_set;

pub use codelink_codebook::{PATH_DELIMITER, ROOT_NAME};
