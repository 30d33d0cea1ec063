use thiserror::Error;

pub type Result<T> = std::result::Result<T, FairDiceError>;

#[derive(Error, Debug)]
pub enum FairDiceError {
    #[error("Invalid die definition: {0}")]
    InvalidDie(String),

    #[error("At least {required} dice are required, got {provided}")]
    TooFewDice { required: usize, provided: usize },

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Index {index} is outside 0..{len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Counterpart value {value} is outside 0..{range}")]
    CounterpartOutOfRange { value: u64, range: u64 },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("Input aborted: {0}")]
    InputAborted(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse classification used by callers that react per error family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed die, range or index. User or configuration error.
    Validation,
    /// A reveal did not match its published MAC.
    ProtocolViolation,
    /// The console could not or would not supply a value.
    InputAbort,
    Internal,
}

impl FairDiceError {
    pub fn invalid_die(msg: impl Into<String>) -> Self {
        Self::InvalidDie(msg.into())
    }

    pub fn invalid_range(msg: impl Into<String>) -> Self {
        Self::InvalidRange(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn protocol_violation(msg: impl Into<String>) -> Self {
        Self::ProtocolViolation(msg.into())
    }

    pub fn input_aborted(msg: impl Into<String>) -> Self {
        Self::InputAborted(msg.into())
    }

    pub fn crypto(msg: impl Into<String>) -> Self {
        Self::Crypto(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDie(_)
            | Self::TooFewDice { .. }
            | Self::InvalidRange(_)
            | Self::IndexOutOfRange { .. }
            | Self::CounterpartOutOfRange { .. }
            | Self::Config(_) => ErrorKind::Validation,
            Self::ProtocolViolation(_) => ErrorKind::ProtocolViolation,
            Self::InputAborted(_) => ErrorKind::InputAbort,
            Self::Crypto(_) | Self::Io(_) | Self::Serialization(_) => ErrorKind::Internal,
        }
    }
}
