mod yahoo;

pub use yahoo::{parse_quote_response, YahooQuoteSource};
