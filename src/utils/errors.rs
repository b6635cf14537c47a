use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtoGalaxyError {
    #[error("Expected {expected} instances to fold but got {got}")]
    InstanceCountMismatch { expected: usize, got: usize },
    #[error("Instance size mismatch: expected {expected} rows but got {got}")]
    InstanceSizeMismatch { expected: usize, got: usize },
    #[error("Invalid instance size: {0}, expected a non-zero power of 2")]
    InvalidInstanceSize(usize),
    #[error("Invalid challenge vector length, expected length {expected} but got {got}")]
    ChallengeLengthMismatch { expected: usize, got: usize },
    #[error("Invalid number of trace columns, expected {expected} but got {got}")]
    ColumnCountMismatch { expected: usize, got: usize },
    #[error("Column {column} has {got} rows, expected {expected}")]
    ColumnLengthMismatch {
        column: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("Attempted to invert zero: {0}")]
    ZeroInversion(&'static str),
    #[error("{relation} subrelation {subrelation} is violated at row {row}")]
    ProtocolViolation {
        relation: &'static str,
        subrelation: usize,
        row: usize,
    },
    #[error("{relation} subrelation {subrelation} does not vanish over the trace")]
    ProtocolSumViolation {
        relation: &'static str,
        subrelation: usize,
    },
    #[error("Folding verification failed: {0}")]
    FoldingVerificationFailed(&'static str),
}

impl ProtoGalaxyError {
    /// Caller misuse detected before any field arithmetic ran.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            ProtoGalaxyError::InstanceCountMismatch { .. }
                | ProtoGalaxyError::InstanceSizeMismatch { .. }
                | ProtoGalaxyError::InvalidInstanceSize(_)
                | ProtoGalaxyError::ChallengeLengthMismatch { .. }
                | ProtoGalaxyError::ColumnCountMismatch { .. }
                | ProtoGalaxyError::ColumnLengthMismatch { .. }
        )
    }
}
