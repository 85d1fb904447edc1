use thiserror::Error;

pub type Result<T> = std::result::Result<T, LinkingError>;

#[derive(Error, Debug)]
pub enum LinkingError {
    /// Requested scenario key is absent from the scenario table.
    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),

    /// The node graph violated its structural guarantees (self-child,
    /// cycle, or a child name missing from the tree). Fatal for the
    /// request; no partial aggregate is returned.
    #[error("Data consistency error: {0}")]
    DataConsistency(String),
}
