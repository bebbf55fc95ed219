//! Rolling per-symbol price history.
//!
//! Every symbol owns a fixed-length buffer of [`Sample`]s ordered oldest to
//! newest. Slots start absent and are never removed: writes fill the first
//! absent slot left to right, and once the buffer is full the oldest slot is
//! dropped and the new sample lands in the last position.
//!
//! The buffer only serves trend arrows, so the single derived value is
//! [`HistoryStore::previous`], the sample written just before the newest one.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use tracing::debug;

use crate::{HistoryError, Symbol, ValidationError};

/// A recorded price, or `None` for a slot that was never written.
pub type Sample = Option<f64>;

/// How the next write position is chosen within a poll batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorMode {
    /// Each buffer tracks its own fill level.
    #[default]
    PerSymbol,
    /// The first tracked symbol's buffer decides fill-or-shift for every
    /// buffer written in the batch.
    Shared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteSlot {
    Fill(usize),
    Shift,
}

/// Fixed-capacity history for a single symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryBuffer {
    slots: VecDeque<Sample>,
    newest: Option<usize>,
}

impl HistoryBuffer {
    fn new(capacity: usize) -> Self {
        Self {
            slots: std::iter::repeat(None).take(capacity).collect(),
            newest: None,
        }
    }

    /// Always equal to the store capacity.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Slots from oldest to newest.
    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        self.slots.iter().copied()
    }

    /// Most recently written sample.
    pub fn latest(&self) -> Sample {
        self.newest.and_then(|index| self.slots[index])
    }

    /// Nearest recorded sample before the most recently written slot.
    pub fn previous(&self) -> Sample {
        let newest = self.newest?;
        self.slots.range(..newest).rev().find_map(|sample| *sample)
    }

    fn next_slot(&self) -> WriteSlot {
        match self.slots.iter().position(Option::is_none) {
            Some(index) => WriteSlot::Fill(index),
            None => WriteSlot::Shift,
        }
    }

    fn write(&mut self, slot: WriteSlot, price: f64) {
        match slot {
            WriteSlot::Fill(index) => {
                self.slots[index] = Some(price);
                self.newest = Some(index);
            }
            WriteSlot::Shift => {
                self.slots.pop_front();
                self.slots.push_back(Some(price));
                self.newest = Some(self.slots.len() - 1);
            }
        }
    }
}

/// Per-symbol price history for the tracked set.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    order: Vec<Symbol>,
    buffers: HashMap<Symbol, HistoryBuffer>,
    capacity: usize,
    mode: CursorMode,
}

impl HistoryStore {
    /// Allocate one all-absent buffer per symbol. Duplicates collapse onto
    /// their first occurrence.
    pub fn init<I>(symbols: I, capacity: usize, mode: CursorMode) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = Symbol>,
    {
        if capacity == 0 {
            return Err(ValidationError::ZeroCapacity);
        }

        let mut order = Vec::new();
        let mut buffers = HashMap::new();
        for symbol in symbols {
            if buffers.contains_key(&symbol) {
                continue;
            }
            buffers.insert(symbol.clone(), HistoryBuffer::new(capacity));
            order.push(symbol);
        }

        Ok(Self {
            order,
            buffers,
            capacity,
            mode,
        })
    }

    /// `ceil(window / poll_interval)`, the slot count needed to cover the window.
    pub fn capacity_for(window: Duration, poll_interval: Duration) -> Result<usize, ValidationError> {
        let poll_ms = poll_interval.as_millis();
        if poll_ms == 0 {
            return Err(ValidationError::ZeroInterval {
                field: "poll_interval",
            });
        }
        let window_ms = window.as_millis();
        if window_ms == 0 {
            return Err(ValidationError::ZeroInterval { field: "window" });
        }

        Ok(window_ms.div_ceil(poll_ms) as usize)
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Tracked symbols in insertion order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.order
    }

    pub fn buffer(&self, symbol: &Symbol) -> Option<&HistoryBuffer> {
        self.buffers.get(symbol)
    }

    /// Record a single sample.
    pub fn record(&mut self, symbol: &Symbol, price: f64) -> Result<(), HistoryError> {
        self.record_batch(&[(symbol.clone(), price)])
    }

    /// Record one poll's worth of samples. The batch is validated up front
    /// and either applied completely or not at all.
    pub fn record_batch(&mut self, samples: &[(Symbol, f64)]) -> Result<(), HistoryError> {
        for (symbol, price) in samples {
            if !self.buffers.contains_key(symbol) {
                return Err(HistoryError::UnknownSymbol {
                    symbol: symbol.to_string(),
                });
            }
            if !price.is_finite() {
                return Err(HistoryError::NonFiniteSample {
                    symbol: symbol.to_string(),
                    value: *price,
                });
            }
        }

        let shared_slot = match self.mode {
            CursorMode::PerSymbol => None,
            CursorMode::Shared => self
                .order
                .first()
                .and_then(|first| self.buffers.get(first))
                .map(HistoryBuffer::next_slot),
        };
        debug!(samples = samples.len(), ?shared_slot, "recording poll batch");

        for (symbol, price) in samples {
            if let Some(buffer) = self.buffers.get_mut(symbol) {
                let slot = shared_slot.unwrap_or_else(|| buffer.next_slot());
                buffer.write(slot, *price);
            }
        }

        Ok(())
    }

    /// Sample recorded immediately before the newest one, or `None` when
    /// fewer than two samples are held or the symbol is not tracked.
    pub fn previous(&self, symbol: &Symbol) -> Sample {
        self.buffers.get(symbol).and_then(HistoryBuffer::previous)
    }

    pub fn latest(&self, symbol: &Symbol) -> Sample {
        self.buffers.get(symbol).and_then(HistoryBuffer::latest)
    }
}
