//! The monitor loop.
//!
//! Two periodic activities share one task:
//!
//! - the **refresh tick** (sub-second) advances the spinner, redraws the
//!   status line and the last rendered table, and checks for a terminal
//!   resize;
//! - the **poll tick** (seconds) starts a fetch on a worker task.
//!
//! Fetch results come back over a channel and are applied by the loop
//! itself, so the loop is the only writer of [`HistoryStore`] and
//! [`UsageCounter`]. A slow fetch never stalls the spinner, and at most one
//! fetch is in flight at a time. The loop exits when the shutdown future
//! resolves and always shows the cursor again before returning.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::quote_source::{FetchBatch, QuoteRequest, QuoteSource, SourceError};
use crate::render::{self, RenderedBlock};
use crate::terminal::{TerminalSink, TerminalSize};
use crate::{
    CoreError, HistoryStore, MarketSession, QuoteRecord, Symbol, TerminalError, TickerConfig,
    UsageCounter, ValidationError,
};

/// Tick intervals for the two activities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorSettings {
    pub refresh_interval: Duration,
    pub poll_interval: Duration,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_millis(200),
            poll_interval: Duration::from_secs(5),
        }
    }
}

impl MonitorSettings {
    pub fn from_config(config: &TickerConfig) -> Self {
        Self {
            refresh_interval: config.refresh_interval(),
            poll_interval: config.poll_interval(),
        }
    }
}

/// Everything the loop owns between ticks.
#[derive(Debug, Clone)]
pub struct MonitorState {
    history: HistoryStore,
    usage: UsageCounter,
    records: Vec<QuoteRecord>,
    block: Option<RenderedBlock>,
    last_update: Option<OffsetDateTime>,
    last_size: Option<TerminalSize>,
    frame: usize,
    polls_ok: u64,
    polls_failed: u64,
    resizes: u64,
}

impl MonitorState {
    fn new(history: HistoryStore) -> Self {
        Self {
            history,
            usage: UsageCounter::new(),
            records: Vec::new(),
            block: None,
            last_update: None,
            last_size: None,
            frame: 0,
            polls_ok: 0,
            polls_failed: 0,
            resizes: 0,
        }
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn usage(&self) -> &UsageCounter {
        &self.usage
    }

    /// Records from the last successful poll.
    pub fn records(&self) -> &[QuoteRecord] {
        &self.records
    }

    /// Table from the last successful poll.
    pub fn block(&self) -> Option<&RenderedBlock> {
        self.block.as_ref()
    }

    pub fn polls_ok(&self) -> u64 {
        self.polls_ok
    }

    pub fn polls_failed(&self) -> u64 {
        self.polls_failed
    }

    /// Resizes detected, each of which cleared the screen.
    pub fn resizes(&self) -> u64 {
        self.resizes
    }

    /// Refresh ticks drawn so far.
    pub fn frames(&self) -> usize {
        self.frame
    }
}

type PollOutcome = Result<FetchBatch, SourceError>;

/// Polls a [`QuoteSource`] and keeps a [`TerminalSink`] up to date.
pub struct Monitor<S, T> {
    source: Arc<S>,
    terminal: T,
    request: QuoteRequest,
    settings: MonitorSettings,
    state: MonitorState,
}

impl<S, T> Monitor<S, T>
where
    S: QuoteSource + 'static,
    T: TerminalSink,
{
    /// Build a monitor tracking every symbol in `history`.
    pub fn new(
        source: Arc<S>,
        terminal: T,
        history: HistoryStore,
        settings: MonitorSettings,
    ) -> Result<Self, ValidationError> {
        if settings.refresh_interval.is_zero() {
            return Err(ValidationError::ZeroInterval {
                field: "refresh_interval",
            });
        }
        if settings.poll_interval.is_zero() {
            return Err(ValidationError::ZeroInterval {
                field: "poll_interval",
            });
        }

        let symbols = history.symbols().to_vec();
        let request = QuoteRequest::new(symbols).map_err(|_| ValidationError::NoSymbols)?;

        Ok(Self {
            source,
            terminal,
            request,
            settings,
            state: MonitorState::new(history),
        })
    }

    /// Build a monitor straight from a loaded config.
    pub fn from_config(source: Arc<S>, terminal: T, config: &TickerConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let history = HistoryStore::init(
            config.symbols.iter().cloned(),
            config.history_capacity()?,
            config.cursor_mode(),
        )?;

        Ok(Self::new(
            source,
            terminal,
            history,
            MonitorSettings::from_config(config),
        )?)
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    pub fn into_terminal(self) -> T {
        self.terminal
    }

    /// Run until `shutdown` resolves. The cursor is hidden for the duration
    /// and shown again on every way out of the loop.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<(), TerminalError>
    where
        F: Future<Output = ()>,
    {
        info!(
            symbols = self.request.symbols.len(),
            capacity = self.state.history.capacity(),
            refresh_ms = self.settings.refresh_interval.as_millis() as u64,
            poll_ms = self.settings.poll_interval.as_millis() as u64,
            "monitor starting"
        );

        let prepared = self
            .terminal
            .hide_cursor()
            .and_then(|()| self.terminal.clear());
        let outcome = match prepared {
            Ok(()) => self.run_loop(shutdown).await,
            Err(error) => Err(error),
        };

        let restored = self.leave_screen();
        info!(
            polls_ok = self.state.polls_ok,
            polls_failed = self.state.polls_failed,
            bytes = self.state.usage.bytes(),
            "monitor stopped"
        );
        outcome.and(restored)
    }

    async fn run_loop<F>(&mut self, shutdown: F) -> Result<(), TerminalError>
    where
        F: Future<Output = ()>,
    {
        let (tx, mut rx) = mpsc::channel::<PollOutcome>(1);
        let mut refresh = interval(self.settings.refresh_interval);
        refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut poll = interval(self.settings.poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut in_flight: Option<AbortHandle> = None;
        tokio::pin!(shutdown);

        let result = loop {
            tokio::select! {
                biased;

                () = &mut shutdown => {
                    info!("shutdown requested");
                    break Ok(());
                }
                Some(outcome) = rx.recv() => {
                    in_flight = None;
                    self.apply_poll(outcome);
                }
                _ = poll.tick() => {
                    if in_flight.is_some() {
                        debug!("previous poll still running, skipping tick");
                    } else {
                        in_flight = Some(self.spawn_poll(tx.clone()));
                    }
                }
                _ = refresh.tick() => {
                    if let Err(error) = self.refresh_tick() {
                        break Err(error);
                    }
                }
            }
        };

        if let Some(handle) = in_flight {
            handle.abort();
        }
        result
    }

    /// Start a fetch on a worker task. A worker that panics is reported as
    /// an internal source error so the next tick can poll again.
    fn spawn_poll(&self, tx: mpsc::Sender<PollOutcome>) -> AbortHandle {
        let source = Arc::clone(&self.source);
        let request = self.request.clone();
        debug!(source = source.name(), "poll started");

        let fetch = tokio::spawn(async move { source.fetch(request).await });
        let abort = fetch.abort_handle();
        tokio::spawn(async move {
            let outcome = fetch.await.unwrap_or_else(|error| {
                Err(SourceError::internal(format!("quote worker failed: {error}")))
            });
            let _ = tx.send(outcome).await;
        });
        abort
    }

    /// Fold one poll result into the state. Failures keep the previous table.
    fn apply_poll(&mut self, outcome: PollOutcome) {
        let batch = match outcome {
            Ok(batch) => batch,
            Err(error) => {
                self.state.polls_failed += 1;
                warn!(%error, "poll failed, keeping last rendered state");
                return;
            }
        };

        self.state.usage.add(batch.bytes_received);
        for symbol in batch.missing(&self.request.symbols) {
            warn!(%symbol, "symbol missing from quote response");
        }

        let mut samples: Vec<(Symbol, f64)> = Vec::with_capacity(batch.records.len());
        for record in &batch.records {
            if let MarketSession::Unknown(raw) = &record.session {
                warn!(symbol = %record.symbol, state = %raw, "unknown market state");
            }
            if self.state.history.buffer(&record.symbol).is_none() {
                warn!(symbol = %record.symbol, "quote for untracked symbol ignored");
                continue;
            }
            match record.active_price() {
                Some(price) => samples.push((record.symbol.clone(), price)),
                None => debug!(symbol = %record.symbol, "no usable price, history unchanged"),
            }
        }

        if let Err(error) = self.state.history.record_batch(&samples) {
            warn!(%error, "history rejected poll batch");
        }

        self.state.block = Some(render::render(&batch.records, &self.state.history));
        self.state.records = batch.records;
        self.state.last_update = Some(OffsetDateTime::now_utc());
        self.state.polls_ok += 1;
        info!(
            records = self.state.records.len(),
            bytes = batch.bytes_received,
            total_bytes = self.state.usage.bytes(),
            "poll applied"
        );
    }

    /// Draw the status line and the current table, then look for a resize.
    fn refresh_tick(&mut self) -> Result<(), TerminalError> {
        let mut frame = render::status_line(
            self.state.frame,
            &self.state.usage,
            self.state.last_update,
        );
        if let Some(block) = &self.state.block {
            frame.push_str(&block.text);
        }
        self.terminal.write(&frame)?;
        self.state.frame = self.state.frame.wrapping_add(1);

        self.detect_resize()
    }

    /// A changed size clears the screen; the next tick redraws everything.
    fn detect_resize(&mut self) -> Result<(), TerminalError> {
        let size = match self.terminal.size() {
            Ok(size) => size,
            Err(error) => {
                debug!(%error, "terminal size unavailable");
                return Ok(());
            }
        };

        let changed = matches!(self.state.last_size, Some(previous) if previous != size);
        self.state.last_size = Some(size);
        if changed {
            debug!(columns = size.0, rows = size.1, "terminal resized");
            self.state.resizes += 1;
            self.terminal.clear()?;
        }
        Ok(())
    }

    /// Park the cursor below the table and make it visible again.
    fn leave_screen(&mut self) -> Result<(), TerminalError> {
        let height = self.state.block.as_ref().map_or(1, |block| block.height);
        let moved = self.terminal.write(&"\n".repeat(usize::from(height)));
        let shown = self.terminal.show_cursor();
        moved.and(shown)
    }
}
