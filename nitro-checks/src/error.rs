use thiserror::Error;

/// Check-specific error types
///
/// This enum defines the failures a conformance check can report. Transport
/// problems and assertion mismatches both end up here so the runner can
/// print one line per failed scenario.
#[derive(Error, Debug)]
pub enum CheckError {
    /// Error talking to the node's JSON-RPC endpoint
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Invalid or missing configuration value
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Error building or using a local signer
    #[error("Signer error: {0}")]
    Signer(String),

    /// Error assembling or encoding a fixture contract
    #[error("Fixture error: {0}")]
    Fixture(String),

    /// Error running a transaction in the in-process EVM
    #[error("Sandbox execution failed: {0}")]
    Sandbox(String),

    /// An observed value differs from the expected one
    #[error("{what}: expected {expected}, got {actual}")]
    Mismatch {
        what: String,
        expected: String,
        actual: String,
    },

    /// A receipt reported the wrong execution status
    #[error("transaction {tx_hash} finished with status {actual}, expected {expected}")]
    UnexpectedStatus {
        tx_hash: String,
        expected: bool,
        actual: bool,
    },

    /// A deployment receipt carried no contract address
    #[error("deployment {0} has no contract address")]
    MissingContractAddress(String),
}

impl CheckError {
    /// Build a [`CheckError::Mismatch`] from anything printable
    pub fn mismatch(
        what: impl Into<String>,
        expected: impl std::fmt::Display,
        actual: impl std::fmt::Display,
    ) -> Self {
        CheckError::Mismatch {
            what: what.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}
