//! Error handling for the pool engine

use thiserror::Error;

/// Asset unit errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("Invalid asset unit: {0}")]
    InvalidUnit(String),

    #[error("Invalid pool identity: {0}")]
    InvalidIdentity(String),
}

/// Datum decoding errors, raised by the external decoder
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Malformed datum: {0}")]
    Malformed(String),

    #[error("Datum references an invalid asset: {0}")]
    InvalidAsset(#[from] AssetError),
}

/// Reserve reconciliation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReserveError {
    #[error("Reserve underflow for {unit}: {value} < {subtrahend}")]
    Underflow {
        unit: String,
        value: String,
        subtrahend: String,
    },

    #[error("Invalid quantity for {unit}: {quantity}")]
    InvalidQuantity { unit: String, quantity: String },

    #[error("{0} UTxOs validate as pool state for the same pool")]
    MultiplePoolCandidates(usize),

    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Stableswap solver errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StableswapError {
    #[error("Amplification coefficient {0} <= 1/4, stableswap math does not hold")]
    AmplificationTooLow(String),

    #[error("Non-positive {0}, stableswap math does not hold")]
    NonPositiveReserve(&'static str),

    #[error("Invariant not fulfilled for calculated {variable}: candidate={candidate}, real={real}")]
    InvariantNotFound {
        variable: &'static str,
        candidate: String,
        real: String,
    },
}

/// Swap quote errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    #[error("Pool not found: {0}")]
    PoolNotFound(String),

    #[error("Swap amount must be positive")]
    NonPositiveSwapAmount,

    #[error("Invalid swap amount: {0}")]
    InvalidSwapAmount(String),

    #[error("Fee of {0} basis points exceeds 10000")]
    InvalidFee(u32),

    #[error("Empty pool reserve")]
    EmptyReserve,

    #[error("Stableswap pool requires an amplification coefficient")]
    MissingAmplification,

    #[error(transparent)]
    Stableswap(#[from] StableswapError),
}

/// Indexer collaborator errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexerError {
    #[error("Datum not found: {0}")]
    DatumNotFound(String),

    #[error("Indexer request failed: {0}")]
    RequestFailed(String),
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Reserve(#[from] ReserveError),

    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error(transparent)]
    Indexer(#[from] IndexerError),
}

impl From<StableswapError> for AppError {
    fn from(err: StableswapError) -> Self {
        AppError::Quote(QuoteError::Stableswap(err))
    }
}
