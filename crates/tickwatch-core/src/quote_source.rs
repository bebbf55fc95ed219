//! Quote source contract.
//!
//! A [`QuoteSource`] turns an ordered symbol list into one [`QuoteRecord`]
//! per symbol the upstream knows about, along with the raw payload size so
//! the caller can account for data usage. Symbols unknown upstream are simply
//! missing from the batch. Sources never retry: a failed fetch is reported
//! to the caller, which keeps showing its last good state.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{QuoteRecord, Symbol};

/// Source-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    InvalidRequest,
    /// Transport failure, non-success status, or an upstream error object.
    Unavailable,
    /// The payload could not be decoded.
    Malformed,
    Internal,
}

/// Structured error returned by a failed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Malformed,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::Malformed => "source.malformed",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Ordered, non-empty symbol list for one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub symbols: Vec<Symbol>,
}

impl QuoteRequest {
    pub fn new(symbols: Vec<Symbol>) -> Result<Self, SourceError> {
        if symbols.is_empty() {
            return Err(SourceError::invalid_request(
                "quote request must include at least one symbol",
            ));
        }
        Ok(Self { symbols })
    }
}

/// Records from one successful fetch plus the raw response size.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchBatch {
    pub records: Vec<QuoteRecord>,
    pub bytes_received: u64,
}

impl FetchBatch {
    pub fn new(records: Vec<QuoteRecord>, bytes_received: u64) -> Self {
        Self {
            records,
            bytes_received,
        }
    }

    /// Requested symbols that came back without a record.
    pub fn missing<'a>(&'a self, requested: &'a [Symbol]) -> impl Iterator<Item = &'a Symbol> + 'a {
        requested
            .iter()
            .filter(move |symbol| !self.records.iter().any(|record| &record.symbol == *symbol))
    }
}

/// Quote source contract.
///
/// Implementations must be `Send + Sync`; the monitor runs fetches on a
/// worker task.
pub trait QuoteSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Fetch current quotes for the requested symbols.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on transport failure, a non-success status,
    /// an upstream error object, or an undecodable payload.
    fn fetch<'a>(
        &'a self,
        req: QuoteRequest,
    ) -> Pin<Box<dyn Future<Output = Result<FetchBatch, SourceError>> + Send + 'a>>;
}
