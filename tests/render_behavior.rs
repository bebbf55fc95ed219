//! Behavior-driven tests for table rendering
//!
//! These tests verify HOW rows are decided (arrow, color, muting) and how
//! the rendered block is framed for in-place redraw.

use tickwatch_core::render::{render, row_view, status_line, SPINNER_FRAMES};
use tickwatch_core::{
    CursorMode, HistoryStore, MarketSession, QuoteRecord, SessionFigures, Symbol, Tone, Trend,
    UsageCounter,
};

const DIM: &str = "\x1b[2m";

fn sym(raw: &str) -> Symbol {
    Symbol::parse(raw).expect("valid symbol")
}

fn history_with(raw: &str, prices: &[f64]) -> HistoryStore {
    let mut history = HistoryStore::init([sym(raw)], 12, CursorMode::PerSymbol).expect("store");
    for price in prices {
        history.record(&sym(raw), *price).expect("tracked");
    }
    history
}

fn regular(raw: &str, session: MarketSession, price: Option<f64>, pct: Option<f64>) -> QuoteRecord {
    QuoteRecord::new(sym(raw), session, SessionFigures::new(price, None, pct))
}

/// Body lines of a rendered block: header first, then one per record.
fn lines(text: &str) -> Vec<&str> {
    text.split('\n').skip(1).collect()
}

// =============================================================================
// Render: Trend Arrows
// =============================================================================

#[test]
fn when_price_is_unchanged_between_polls_arrow_points_up() {
    // Given: Two equal samples in history
    let history = history_with("NOK", &[10.0, 10.0]);

    // When: The row is decided for the latest quote
    let record = regular("NOK", MarketSession::Regular, Some(10.0), Some(-0.4));
    let row = row_view(&record, &history);

    // Then: Equal counts as up, while color still follows the percent sign
    assert_eq!(row.trend, Trend::Up);
    assert_eq!(row.tone, Tone::Negative);
    assert!(!row.muted);
}

#[test]
fn when_price_drops_between_polls_arrow_points_down() {
    let history = history_with("NOK", &[10.0, 9.5]);

    let record = regular("NOK", MarketSession::Regular, Some(9.5), Some(1.2));
    let row = row_view(&record, &history);

    assert_eq!(row.trend, Trend::Down);
    assert_eq!(row.tone, Tone::Positive);
}

#[test]
fn when_there_is_no_previous_sample_arrow_points_up() {
    let history = history_with("NOK", &[9.5]);

    let record = regular("NOK", MarketSession::Regular, Some(9.5), Some(-3.0));
    let row = row_view(&record, &history);

    assert_eq!(row.trend, Trend::Up);
}

#[test]
fn when_market_is_closed_arrow_follows_percent_sign_and_row_is_muted() {
    // Given: History that would say "up"
    let history = history_with("GME", &[20.0, 21.0]);

    // When: The session is closed with a negative change
    let record = regular("GME", MarketSession::Closed, Some(21.0), Some(-1.5));
    let row = row_view(&record, &history);

    // Then: Down, red, dim
    assert_eq!(row.trend, Trend::Down);
    assert_eq!(row.tone, Tone::Negative);
    assert!(row.muted);
    assert_eq!(row.session_label, "[CLOSED]");
}

#[test]
fn when_pre_and_post_close_sessions_are_reported_they_are_muted_too() {
    let history = history_with("GME", &[]);

    for session in [MarketSession::PreOpen, MarketSession::PostClose] {
        let row = row_view(&regular("GME", session, Some(1.0), Some(0.5)), &history);
        assert!(row.muted);
        assert_eq!(row.session_label, "[CLOSED]");
    }
}

// =============================================================================
// Render: Placeholders
// =============================================================================

#[test]
fn when_change_percent_is_missing_placeholder_is_shown_in_positive_tone() {
    let history = history_with("NOK", &[4.0]);

    let row = row_view(&regular("NOK", MarketSession::Regular, Some(4.0), None), &history);

    assert_eq!(row.change_text(), "=%");
    assert_eq!(row.tone, Tone::Positive);
}

#[test]
fn when_price_is_missing_dash_is_shown() {
    let history = history_with("NOK", &[]);

    let row = row_view(&regular("NOK", MarketSession::Regular, None, Some(0.1)), &history);

    assert_eq!(row.price_text(), "-");
    assert_eq!(row.trend, Trend::Up);
}

#[test]
fn when_session_is_unknown_raw_state_is_visible() {
    let history = history_with("NOK", &[4.0]);

    let record = regular(
        "NOK",
        MarketSession::from_upstream("HALTED"),
        Some(4.0),
        Some(0.2),
    );
    let row = row_view(&record, &history);

    assert_eq!(row.session_label, "[??? HALTED]");
    assert!(!row.muted);
}

// =============================================================================
// Render: Block Layout
// =============================================================================

#[test]
fn when_rendered_block_has_header_and_one_line_per_record() {
    // Given: Two records, one closed
    let mut history =
        HistoryStore::init([sym("GME"), sym("NOK")], 12, CursorMode::PerSymbol).expect("store");
    history
        .record_batch(&[(sym("GME"), 20.5), (sym("NOK"), 4.1)])
        .expect("batch");
    let records = vec![
        regular("GME", MarketSession::Regular, Some(20.5), Some(2.25)),
        regular("NOK", MarketSession::Closed, Some(4.1), Some(-1.5)),
    ];

    // When: The block is rendered
    let block = render(&records, &history);

    // Then: Leading newline, header, two rows, and a move back up
    assert!(block.text.starts_with('\n'));
    assert_eq!(block.height, 4);
    assert!(block.text.ends_with("\r\x1b[4A"));

    let body = lines(&block.text);
    assert!(body[0].contains("TICKER"));
    assert!(body[0].contains("MARKET"));
    assert!(body[1].contains("GME"));
    assert!(body[1].contains("20.5000"));
    assert!(body[1].contains("+2.25%"));
    assert!(body[1].contains("[OPEN]"));
    assert!(!body[1].contains(DIM));
    assert!(body[2].contains("NOK"));
    assert!(body[2].contains("-1.50%"));
    assert!(body[2].contains(DIM));
}

#[test]
fn when_a_batch_shrinks_rows_left_from_the_previous_frame_are_erased() {
    // Given: A frame with three rows
    let symbols = [sym("GME"), sym("NOK"), sym("TSLA")];
    let history = HistoryStore::init(symbols, 12, CursorMode::PerSymbol).expect("store");
    let full = vec![
        regular("GME", MarketSession::Regular, Some(20.0), Some(1.0)),
        regular("NOK", MarketSession::Regular, Some(4.0), Some(1.0)),
        regular("TSLA", MarketSession::Regular, Some(250.0), Some(1.0)),
    ];
    let first = render(&full, &history);

    // When: TSLA is missing from the next batch
    let second = render(&full[..2], &history);

    // Then: The shorter block erases everything below its last row
    assert_eq!(first.height, 5);
    assert_eq!(second.height, 4);
    assert!(!second.text.contains("TSLA"));
    let clear_below = "\x1b[J";
    let tail = second.text.rsplit('\n').next().expect("text after last row");
    assert!(tail.starts_with(clear_below));
    assert!(second.text.ends_with("\r\x1b[4A"));
}

#[test]
fn when_no_records_are_available_header_is_still_rendered() {
    let history = history_with("NOK", &[]);

    let block = render(&[], &history);

    assert_eq!(block.height, 2);
    assert!(lines(&block.text)[0].contains("TICKER"));
}

// =============================================================================
// Render: Status Line
// =============================================================================

#[test]
fn when_status_line_is_drawn_spinner_advances_with_frame_and_usage_is_shown() {
    let mut usage = UsageCounter::new();
    usage.add(1_500_000);

    let first = status_line(0, &usage, None);
    let wrapped = status_line(SPINNER_FRAMES.len(), &usage, None);
    let second = status_line(1, &usage, None);

    assert!(first.contains(SPINNER_FRAMES[0]));
    assert!(second.contains(SPINNER_FRAMES[1]));
    assert_eq!(first, wrapped);
    assert!(first.contains("1.5 MB"));
    assert!(first.contains("updated waiting"));
    assert!(first.contains("quit: ctrl+c"));
    assert!(first.starts_with('\r'));
}
