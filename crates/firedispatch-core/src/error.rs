use thiserror::Error;

pub type Result<T> = std::result::Result<T, DispatchError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    /// Fleet, base or water-source data absent or empty.
    #[error("missing data: {0}")]
    MissingData(String),

    /// A helicopter points at a base index outside the helipad directory.
    #[error("helicopter {helicopter} references base {base}, but only {known} bases are known")]
    InvalidReference {
        helicopter: u32,
        base: usize,
        known: usize,
    },

    /// The solver did not report an optimal solution for a scenario group.
    #[error("scenario group {group} has no optimal solution (solver status: {status})")]
    InfeasibleScenario { group: usize, status: String },

    /// Missing or malformed configuration, or no resolvable solver.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("fire {fire} has an unparseable timestamp {value:?}")]
    InvalidTimestamp { fire: String, value: String },
}

impl DispatchError {
    /// `true` for errors that must stop the process at startup.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DispatchError::Configuration(_))
    }
}
