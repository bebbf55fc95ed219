//! # Tickwatch Core
//!
//! Quote polling, rolling price history, and terminal rendering for the
//! `tickwatch` terminal ticker.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Quote source implementations (Yahoo Finance) |
//! | [`config`] | Symbol list and tuning, persisted as JSON |
//! | [`domain`] | Symbols, market sessions, quote records |
//! | [`error`] | Core error types |
//! | [`history`] | Fixed-capacity per-symbol price history |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`monitor`] | Refresh/poll loop driving the terminal |
//! | [`quote_source`] | Quote source trait and fetch types |
//! | [`render`] | Ticker table and status line formatting |
//! | [`terminal`] | Terminal sink trait and crossterm backend |
//! | [`usage`] | Cumulative data-usage counter |
//!
//! ## Data Flow
//!
//! ```text
//! ┌─────────────────┐  poll tick   ┌──────────────────┐
//! │ Monitor loop    │─────────────▶│ QuoteSource      │
//! │ (single writer) │◀─────────────│ (worker task)    │
//! └────────┬────────┘  FetchBatch  └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ HistoryStore    │────▶│ Renderer         │
//! └─────────────────┘     └────────┬─────────┘
//!                                  │ refresh tick
//!                                  ▼
//!                         ┌──────────────────┐
//!                         │ TerminalSink     │
//!                         └──────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tickwatch_core::{ConfigStore, CrosstermTerminal, Monitor, YahooQuoteSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = ConfigStore::default();
//!     let config = store.load_or_create(&mut std::io::stdin().lock(), &mut std::io::stdout())?;
//!
//!     let mut monitor = Monitor::from_config(
//!         Arc::new(YahooQuoteSource::default()),
//!         CrosstermTerminal::stdout(),
//!         &config,
//!     )?;
//!     monitor.run(async { let _ = tokio::signal::ctrl_c().await; }).await?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod history;
pub mod http_client;
pub mod monitor;
pub mod quote_source;
pub mod render;
pub mod terminal;
pub mod usage;

pub use adapters::{parse_quote_response, YahooQuoteSource};

pub use config::{ConfigStore, TickerConfig, DEFAULT_CONFIG_PATH, DEFAULT_SYMBOLS};

pub use domain::{MarketSession, QuoteRecord, SessionFigures, Symbol};

pub use error::{ConfigError, CoreError, HistoryError, TerminalError, ValidationError};

pub use history::{CursorMode, HistoryBuffer, HistoryStore, Sample};

pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

pub use monitor::{Monitor, MonitorSettings, MonitorState};

pub use quote_source::{FetchBatch, QuoteRequest, QuoteSource, SourceError, SourceErrorKind};

pub use render::{RenderedBlock, RowView, Tone, Trend};

pub use terminal::{CrosstermTerminal, CursorRestore, TerminalSink, TerminalSize};

pub use usage::{format_usage, UsageCounter};
