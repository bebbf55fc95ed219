//! Symbol list and tuning knobs, persisted as JSON.
//!
//! A missing file is created by prompting for symbols. A file that exists
//! but cannot be used (bad JSON, no `symbols`, an invalid symbol) is deleted
//! and recreated the same way instead of aborting startup.

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{ConfigError, CursorMode, HistoryStore, Symbol, ValidationError};

pub const DEFAULT_CONFIG_PATH: &str = "tickwatch-config.json";

/// Used when the prompt gets an empty answer.
pub const DEFAULT_SYMBOLS: [&str; 3] = ["GME", "NOK", "NOKIA.HE"];

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_refresh_interval_ms() -> u64 {
    200
}

fn default_window_secs() -> u64 {
    60
}

/// Contents of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerConfig {
    pub symbols: Vec<Symbol>,

    /// Seconds between quote polls.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Milliseconds between spinner/redraw ticks.
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,

    /// Seconds of price history kept per symbol.
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Drive every buffer from the first symbol's write position.
    #[serde(default)]
    pub shared_cursor: bool,
}

impl TickerConfig {
    /// Config with default tuning. Duplicate symbols keep their first position.
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self {
            symbols: dedup(symbols),
            poll_interval_secs: default_poll_interval_secs(),
            refresh_interval_ms: default_refresh_interval_ms(),
            window_secs: default_window_secs(),
            shared_cursor: false,
        }
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Self::from_slice(text.as_bytes())
    }

    /// Decode raw file contents. Bytes that are not UTF-8 are a JSON error,
    /// not an I/O one.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_slice(bytes)?;
        config.symbols = dedup(config.symbols);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.symbols.is_empty() {
            return Err(ValidationError::NoSymbols);
        }
        if self.poll_interval_secs == 0 {
            return Err(ValidationError::ZeroInterval {
                field: "poll_interval_secs",
            });
        }
        if self.refresh_interval_ms == 0 {
            return Err(ValidationError::ZeroInterval {
                field: "refresh_interval_ms",
            });
        }
        if self.window_secs == 0 {
            return Err(ValidationError::ZeroInterval {
                field: "window_secs",
            });
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn history_capacity(&self) -> Result<usize, ValidationError> {
        HistoryStore::capacity_for(self.window(), self.poll_interval())
    }

    pub fn cursor_mode(&self) -> CursorMode {
        if self.shared_cursor {
            CursorMode::Shared
        } else {
            CursorMode::PerSymbol
        }
    }
}

fn dedup(symbols: Vec<Symbol>) -> Vec<Symbol> {
    let mut unique: Vec<Symbol> = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        if !unique.contains(&symbol) {
            unique.push(symbol);
        }
    }
    unique
}

/// File-backed config location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigStore {
    path: PathBuf,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_PATH)
    }
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<TickerConfig, ConfigError> {
        let bytes = fs::read(&self.path)?;
        TickerConfig::from_slice(&bytes)
    }

    pub fn save(&self, config: &TickerConfig) -> Result<(), ConfigError> {
        let mut text = serde_json::to_string_pretty(config)?;
        text.push('\n');
        fs::write(&self.path, text)?;
        Ok(())
    }

    /// Load the config, creating it from the prompt when missing and
    /// recreating it when unusable. Only I/O failures are returned.
    pub fn load_or_create<R, W>(&self, input: &mut R, output: &mut W) -> Result<TickerConfig, ConfigError>
    where
        R: BufRead,
        W: Write,
    {
        if self.path.exists() {
            match self.load() {
                Ok(config) => return Ok(config),
                Err(ConfigError::Io(error)) => return Err(ConfigError::Io(error)),
                Err(error) => {
                    warn!(path = %self.path.display(), %error, "config unusable, recreating");
                    fs::remove_file(&self.path)?;
                }
            }
        }

        let config = TickerConfig::new(prompt_symbols(input, output)?);
        self.save(&config)?;
        info!(
            path = %self.path.display(),
            symbols = config.symbols.len(),
            "config created"
        );
        Ok(config)
    }
}

/// Ask for space-separated symbols. Invalid entries are reported and
/// skipped; an empty answer (or EOF) yields [`DEFAULT_SYMBOLS`].
pub fn prompt_symbols<R, W>(input: &mut R, output: &mut W) -> Result<Vec<Symbol>, ConfigError>
where
    R: BufRead,
    W: Write,
{
    writeln!(
        output,
        "Enter the tickers you want to follow, separated by spaces (NOK NIO AAPL etc.)"
    )?;
    write!(output, "Enter tickers: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let mut symbols = Vec::new();
    for token in line.split_whitespace() {
        match Symbol::parse(token) {
            Ok(symbol) => symbols.push(symbol),
            Err(error) => writeln!(output, "skipping '{token}': {error}")?,
        }
    }

    if symbols.is_empty() {
        symbols = DEFAULT_SYMBOLS
            .iter()
            .map(|raw| Symbol::parse(raw))
            .collect::<Result<Vec<_>, _>>()?;
    }

    Ok(symbols)
}
