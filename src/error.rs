use thiserror::Error;

/// Errors raised by the detector during setup or transaction handling.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DetectorError {
    #[error("detector is not initialized")]
    NotInitialized,

    #[error("no deposit threshold configured for chain {chain_id}")]
    MissingThreshold { chain_id: u64 },

    #[error("no watched addresses configured for chain {chain_id}")]
    MissingWatchedAddresses { chain_id: u64 },

    #[error("invalid deposit threshold {value:?}: expected a base-unit integer")]
    InvalidThreshold { value: String },

    #[error("observation window must be positive and fit in seconds")]
    InvalidWindow,

    #[error("invalid watched address {value:?}")]
    InvalidWatchedAddress { value: String },
}

/// Errors raised while turning raw event logs into deposit events.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid hex in {field}: {reason}")]
    Hex { field: &'static str, reason: String },

    #[error("expected {expected} topics, got {got}")]
    TopicCount { expected: usize, got: usize },

    #[error("{field} must be a 32-byte word, got {len} bytes")]
    WordLength { field: &'static str, len: usize },

    #[error("invalid decimal amount {0:?}")]
    Amount(String),
}

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid RPC url: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP transport error: {0}")]
    Transport(String),

    #[error("provider error: {0}")]
    Provider(#[from] ethers::providers::ProviderError),

    #[error("unexpected RPC result: {0}")]
    InvalidResult(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors raised while bringing a detector up.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to resolve chain id: {0}")]
    Network(#[from] RpcError),

    #[error(transparent)]
    Detector(#[from] DetectorError),
}
