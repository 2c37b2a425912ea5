use thiserror::Error;

use crate::domain::{MarketId, Outcome, PositionId};

/// Stable discriminant for [`EngineError`], for callers that map failures to
/// user-facing messages without matching on payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ArithmeticOverflow,
    DivisionByZero,
    MarketClosed,
    AlreadyResolved,
    TooEarly,
    MarketNotResolved,
    InsufficientShares,
    InsufficientLiquidity,
    SlippageExceeded,
    PaymentFailed,
    OracleUnavailable,
    MarketNotFound,
    PositionNotFound,
    NotPositionOwner,
    InvalidAmount,
    InvalidMarket,
    InvalidFee,
    TradingPaused,
    Unauthorized,
}

/// Every way a market operation can fail.
///
/// An operation that returns any of these has left market, position and
/// ledger state exactly as it found them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    #[error("division by zero")]
    DivisionByZero,

    #[error("market {market_id} is closed for trading")]
    MarketClosed { market_id: MarketId },

    #[error("market {market_id} is already resolved")]
    AlreadyResolved { market_id: MarketId },

    #[error("market {market_id} cannot be resolved yet")]
    TooEarly { market_id: MarketId },

    #[error("market {market_id} is not resolved")]
    MarketNotResolved { market_id: MarketId },

    #[error("insufficient shares: requested {requested}, held {held}")]
    InsufficientShares { requested: u64, held: u64 },

    #[error("insufficient liquidity: {reason}")]
    InsufficientLiquidity { reason: String },

    #[error("slippage exceeded: cost {cost} > max payment {max_payment}")]
    SlippageExceeded { cost: u64, max_payment: u64 },

    #[error("payment failed: {reason}")]
    PaymentFailed { reason: String },

    #[error("oracle unavailable for market {market_id}: {reason}")]
    OracleUnavailable { market_id: MarketId, reason: String },

    #[error("market not found: {market_id}")]
    MarketNotFound { market_id: MarketId },

    #[error("position {position_id} not found in market {market_id}")]
    PositionNotFound {
        market_id: MarketId,
        position_id: PositionId,
    },

    #[error("no {outcome} position held in market {market_id}")]
    NoPositionHeld { market_id: MarketId, outcome: Outcome },

    #[error("caller does not own position {position_id}")]
    NotPositionOwner { position_id: PositionId },

    #[error("invalid amount: {reason}")]
    InvalidAmount { reason: String },

    #[error("invalid market: {reason}")]
    InvalidMarket { reason: String },

    #[error("invalid fee: {fee_bps} bps exceeds cap of {max_fee_bps} bps")]
    InvalidFee { fee_bps: u64, max_fee_bps: u64 },

    #[error("trading is paused")]
    TradingPaused,

    #[error("caller is not authorized to {action}")]
    Unauthorized { action: &'static str },
}

impl EngineError {
    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ArithmeticOverflow => ErrorKind::ArithmeticOverflow,
            Self::DivisionByZero => ErrorKind::DivisionByZero,
            Self::MarketClosed { .. } => ErrorKind::MarketClosed,
            Self::AlreadyResolved { .. } => ErrorKind::AlreadyResolved,
            Self::TooEarly { .. } => ErrorKind::TooEarly,
            Self::MarketNotResolved { .. } => ErrorKind::MarketNotResolved,
            Self::InsufficientShares { .. } => ErrorKind::InsufficientShares,
            Self::InsufficientLiquidity { .. } => ErrorKind::InsufficientLiquidity,
            Self::SlippageExceeded { .. } => ErrorKind::SlippageExceeded,
            Self::PaymentFailed { .. } => ErrorKind::PaymentFailed,
            Self::OracleUnavailable { .. } => ErrorKind::OracleUnavailable,
            Self::MarketNotFound { .. } => ErrorKind::MarketNotFound,
            Self::PositionNotFound { .. } | Self::NoPositionHeld { .. } => {
                ErrorKind::PositionNotFound
            }
            Self::NotPositionOwner { .. } => ErrorKind::NotPositionOwner,
            Self::InvalidAmount { .. } => ErrorKind::InvalidAmount,
            Self::InvalidMarket { .. } => ErrorKind::InvalidMarket,
            Self::InvalidFee { .. } => ErrorKind::InvalidFee,
            Self::TradingPaused => ErrorKind::TradingPaused,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
        }
    }

    pub(crate) fn liquidity(reason: impl Into<String>) -> Self {
        Self::InsufficientLiquidity {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_amount(reason: impl Into<String>) -> Self {
        Self::InvalidAmount {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_market(reason: impl Into<String>) -> Self {
        Self::InvalidMarket {
            reason: reason.into(),
        }
    }
}

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
