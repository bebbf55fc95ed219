//! # Domain Models
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated, case-preserving ticker symbol |
//! | [`MarketSession`] | Upstream trading-session phase |
//! | [`QuoteRecord`] | One symbol's quote with per-session figures |
//! | [`SessionFigures`] | Price/change/percent for one session |

mod quote;
mod session;
mod symbol;

pub use quote::{QuoteRecord, SessionFigures};
pub use session::MarketSession;
pub use symbol::Symbol;
