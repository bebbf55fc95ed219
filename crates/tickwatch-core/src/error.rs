use thiserror::Error;

/// Validation errors for symbols, intervals, and history sizing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol contains invalid character {ch:?} at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },
    #[error("at least one symbol must be tracked")]
    NoSymbols,

    #[error("history capacity must be greater than zero")]
    ZeroCapacity,
    #[error("interval '{field}' must be greater than zero")]
    ZeroInterval { field: &'static str },
}

/// Errors raised when writing into the price history.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HistoryError {
    #[error("symbol '{symbol}' is not tracked")]
    UnknownSymbol { symbol: String },
    #[error("sample for '{symbol}' must be finite, got {value}")]
    NonFiniteSample { symbol: String, value: f64 },
}

/// Errors raised while loading or creating the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config is not valid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Errors raised by a terminal sink.
#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("terminal io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Terminal(#[from] TerminalError),
}
