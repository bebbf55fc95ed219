//! Ticker table and status line rendering.
//!
//! [`row_view`] holds every per-row decision (trend arrow, muting, tone) so
//! it can be checked without parsing escape sequences; [`render`] lays the
//! rows out into a block that ends by moving the cursor back to where it
//! started, so the next frame overwrites it in place.

use crossterm::cursor::MoveUp;
use crossterm::style::{Attribute, Color, ContentStyle, Stylize};
use crossterm::terminal::{Clear, ClearType};
use time::macros::format_description;
use time::OffsetDateTime;

use crate::{HistoryStore, QuoteRecord, Symbol, UsageCounter};

/// Spinner animation, one frame per fast tick.
pub const SPINNER_FRAMES: [char; 6] = ['⠷', '⠯', '⠟', '⠻', '⠽', '⠾'];

const HEADER_TICKER: &str = "TICKER";
const HEADER_TREND: &str = "Δ";
const HEADER_PRICE: &str = "PRICE";
const HEADER_CHANGE: &str = "CHANGE";
const HEADER_MARKET: &str = "MARKET";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    pub const fn arrow(self) -> char {
        match self {
            Self::Up => '↑',
            Self::Down => '↓',
        }
    }
}

/// Color family of a row, from the sign of the change percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Negative,
}

impl Tone {
    const fn color(self) -> Color {
        match self {
            Self::Positive => Color::Green,
            Self::Negative => Color::Red,
        }
    }
}

/// Display decisions for one ticker row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub symbol: Symbol,
    pub trend: Trend,
    pub tone: Tone,
    /// Closed-class sessions render dim.
    pub muted: bool,
    pub price: Option<f64>,
    pub change_percent: Option<f64>,
    pub session_label: String,
}

impl RowView {
    pub fn price_text(&self) -> String {
        match self.price {
            Some(price) => format!("{price:.4}"),
            None => String::from("-"),
        }
    }

    /// Signed percent, or `=` when upstream gave no percent at all.
    pub fn change_text(&self) -> String {
        match self.change_percent {
            Some(pct) if pct >= 0.0 => format!("+{pct:.2}%"),
            Some(pct) => format!("{pct:.2}%"),
            None => String::from("=%"),
        }
    }
}

/// Decide arrow, tone, and muting for a record. Expects the record's price
/// to already be in `history`, so [`HistoryStore::previous`] is the prior poll.
pub fn row_view(record: &QuoteRecord, history: &HistoryStore) -> RowView {
    let active = record.active();
    let price = record.active_price();
    let change_percent = active.change_percent.filter(|pct| pct.is_finite());
    let muted = record.session.is_closed_class();

    let by_sign = match change_percent {
        Some(pct) if pct < 0.0 => Trend::Down,
        _ => Trend::Up,
    };

    let trend = if muted {
        by_sign
    } else {
        match (price, history.previous(&record.symbol)) {
            // Equal prices count as up.
            (Some(current), Some(previous)) if current < previous => Trend::Down,
            (Some(_), _) => Trend::Up,
            (None, _) => by_sign,
        }
    };

    let tone = match change_percent {
        Some(pct) if pct < 0.0 => Tone::Negative,
        _ => Tone::Positive,
    };

    RowView {
        symbol: record.symbol.clone(),
        trend,
        tone,
        muted,
        price,
        change_percent,
        session_label: record.session.label(),
    }
}

/// Rows for a whole batch, in batch order.
pub fn row_views(records: &[QuoteRecord], history: &HistoryStore) -> Vec<RowView> {
    records
        .iter()
        .map(|record| row_view(record, history))
        .collect()
}

/// A formatted table ready for the terminal sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBlock {
    pub text: String,
    /// Lines the block moves down before returning the cursor.
    pub height: u16,
}

#[derive(Debug, Clone, Copy)]
struct ColumnWidths {
    ticker: usize,
    price: usize,
    change: usize,
    market: usize,
}

impl ColumnWidths {
    fn measure(rows: &[(RowView, String, String)]) -> Self {
        Self {
            ticker: widest(HEADER_TICKER, rows.iter().map(|(row, _, _)| row.symbol.width())),
            price: widest(HEADER_PRICE, rows.iter().map(|(_, price, _)| price.chars().count())),
            change: widest(
                HEADER_CHANGE,
                rows.iter().map(|(_, _, change)| change.chars().count()),
            ),
            market: widest(
                HEADER_MARKET,
                rows.iter().map(|(row, _, _)| row.session_label.chars().count()),
            ),
        }
    }
}

fn widest(header: &str, cells: impl Iterator<Item = usize>) -> usize {
    cells.fold(header.chars().count(), usize::max)
}

/// Render the header and one line per record. Column widths are measured
/// fresh for every batch.
pub fn render(records: &[QuoteRecord], history: &HistoryStore) -> RenderedBlock {
    let rows = row_views(records, history)
        .into_iter()
        .map(|row| {
            let price = row.price_text();
            let change = row.change_text();
            (row, price, change)
        })
        .collect::<Vec<_>>();
    let widths = ColumnWidths::measure(&rows);

    let header_style = ContentStyle::new().attribute(Attribute::Dim);
    let header = format!(
        "{:>tw$} {} {:>pw$} {:>cw$}  {:<mw$}",
        HEADER_TICKER,
        HEADER_TREND,
        HEADER_PRICE,
        HEADER_CHANGE,
        HEADER_MARKET,
        tw = widths.ticker,
        pw = widths.price,
        cw = widths.change,
        mw = widths.market,
    );

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(header_style.apply(header).to_string());
    for (row, price, change) in &rows {
        lines.push(format_row(row, price, change, widths));
    }

    let mut text = String::from("\n");
    for line in &lines {
        text.push_str(line);
        text.push_str(&Clear(ClearType::UntilNewLine).to_string());
        text.push('\n');
    }

    // A shorter batch must not leave the previous frame's last rows behind.
    text.push_str(&Clear(ClearType::FromCursorDown).to_string());

    // Leading newline plus one newline per line.
    let height = u16::try_from(lines.len() + 1).unwrap_or(u16::MAX);
    text.push('\r');
    text.push_str(&MoveUp(height).to_string());

    RenderedBlock { text, height }
}

fn format_row(row: &RowView, price: &str, change: &str, widths: ColumnWidths) -> String {
    let color = row.tone.color();
    let mut symbol_style = ContentStyle::new().with(color).attribute(Attribute::Bold);
    let mut arrow_style = ContentStyle::new().with(color);
    let mut body_style = ContentStyle::new().with(color);

    if row.muted {
        symbol_style = symbol_style.attribute(Attribute::Dim);
        arrow_style = arrow_style.attribute(Attribute::Dim);
        body_style = body_style.attribute(Attribute::Dim);
    } else {
        arrow_style = arrow_style.attribute(Attribute::Bold);
    }

    let symbol = format!("{:>tw$}", row.symbol.as_str(), tw = widths.ticker);
    let body = format!(
        "{:>pw$} {:>cw$}  {:<mw$}",
        price,
        change,
        row.session_label,
        pw = widths.price,
        cw = widths.change,
        mw = widths.market,
    );

    format!(
        "{} {} {}",
        symbol_style.apply(symbol),
        arrow_style.apply(row.trend.arrow()),
        body_style.apply(body)
    )
}

/// One-line status: spinner, name and version, data usage, and the time of
/// the last successful poll.
pub fn status_line(frame: usize, usage: &UsageCounter, last_update: Option<OffsetDateTime>) -> String {
    let spinner = SPINNER_FRAMES[frame % SPINNER_FRAMES.len()];
    let updated = match last_update {
        Some(at) => at
            .format(format_description!("[hour]:[minute]:[second] UTC"))
            .unwrap_or_else(|_| String::from("--:--:--")),
        None => String::from("waiting"),
    };
    let text = format!(
        " tickwatch {} | {} | updated {} | quit: ctrl+c",
        env!("CARGO_PKG_VERSION"),
        usage,
        updated
    );

    format!(
        "\r{}{}{}\r",
        spinner.with(Color::Green).attribute(Attribute::Bold),
        ContentStyle::new().attribute(Attribute::Dim).apply(text),
        Clear(ClearType::UntilNewLine)
    )
}
