use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::quote_source::{FetchBatch, QuoteRequest, QuoteSource, SourceError};
use crate::{MarketSession, QuoteRecord, SessionFigures, Symbol};

const QUOTE_ENDPOINT: &str = "https://query1.finance.yahoo.com/v7/finance/quote";
const REQUEST_TIMEOUT_MS: u64 = 10_000;

const QUOTE_FIELDS: [&str; 11] = [
    "symbol",
    "marketState",
    "regularMarketPrice",
    "regularMarketChange",
    "regularMarketChangePercent",
    "preMarketPrice",
    "preMarketChange",
    "preMarketChangePercent",
    "postMarketPrice",
    "postMarketChange",
    "postMarketChangePercent",
];

/// Yahoo Finance v7 quote endpoint.
#[derive(Clone)]
pub struct YahooQuoteSource {
    http_client: Arc<dyn HttpClient>,
    endpoint: String,
}

impl Default for YahooQuoteSource {
    fn default() -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::default()))
    }
}

impl YahooQuoteSource {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            endpoint: String::from(QUOTE_ENDPOINT),
        }
    }

    /// Point the source at another host serving the same payload shape.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Full request URL for the given symbols.
    pub fn request_url(&self, req: &QuoteRequest) -> String {
        let symbols = req
            .symbols
            .iter()
            .map(Symbol::as_str)
            .collect::<Vec<_>>()
            .join(",");

        format!(
            "{}?lang=en-US&region=US&corsDomain=finance.yahoo.com&fields={}&symbols={}",
            self.endpoint,
            urlencoding::encode(&QUOTE_FIELDS.join(",")),
            urlencoding::encode(&symbols)
        )
    }

    async fn fetch_quotes(&self, req: &QuoteRequest) -> Result<FetchBatch, SourceError> {
        let request = HttpRequest::get(self.request_url(req))
            .with_header("accept", "application/json")
            .with_timeout_ms(REQUEST_TIMEOUT_MS);

        let response = self.http_client.execute(request).await.map_err(|e| {
            SourceError::unavailable(format!("yahoo transport error: {}", e.message()))
        })?;

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "yahoo returned status {}",
                response.status
            )));
        }

        let records = parse_quote_response(&response.body)?;
        debug!(
            records = records.len(),
            bytes = response.raw_len,
            "yahoo quote response decoded"
        );
        Ok(FetchBatch::new(records, response.raw_len))
    }
}

impl QuoteSource for YahooQuoteSource {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    fn fetch<'a>(
        &'a self,
        req: QuoteRequest,
    ) -> Pin<Box<dyn Future<Output = Result<FetchBatch, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            if req.symbols.is_empty() {
                return Err(SourceError::invalid_request(
                    "yahoo quote request requires at least one symbol",
                ));
            }

            self.fetch_quotes(&req).await
        })
    }
}

/// Decode a `quoteResponse` payload. Entries with an unusable symbol are
/// dropped with a warning rather than failing the whole batch.
pub fn parse_quote_response(body: &str) -> Result<Vec<QuoteRecord>, SourceError> {
    let payload: YahooQuoteResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::malformed(format!("failed to parse yahoo response: {e}")))?;

    if let Some(error) = payload.quote_response.error {
        if !error.is_null() {
            return Err(SourceError::unavailable(format!("yahoo API error: {error}")));
        }
    }

    let records = payload
        .quote_response
        .result
        .into_iter()
        .filter_map(|quote| match Symbol::parse(&quote.symbol) {
            Ok(symbol) => Some(quote.into_record(symbol)),
            Err(error) => {
                warn!(symbol = %quote.symbol, %error, "skipping quote with invalid symbol");
                None
            }
        })
        .collect();

    Ok(records)
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteResponse {
    #[serde(rename = "quoteResponse")]
    quote_response: YahooQuoteResponseData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteResponseData {
    #[serde(default)]
    result: Vec<YahooQuote>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooQuote {
    symbol: String,
    #[serde(default)]
    market_state: Option<String>,
    #[serde(default)]
    regular_market_price: Option<f64>,
    #[serde(default)]
    regular_market_change: Option<f64>,
    #[serde(default)]
    regular_market_change_percent: Option<f64>,
    #[serde(default)]
    pre_market_price: Option<f64>,
    #[serde(default)]
    pre_market_change: Option<f64>,
    #[serde(default)]
    pre_market_change_percent: Option<f64>,
    #[serde(default)]
    post_market_price: Option<f64>,
    #[serde(default)]
    post_market_change: Option<f64>,
    #[serde(default)]
    post_market_change_percent: Option<f64>,
}

impl YahooQuote {
    fn into_record(self, symbol: Symbol) -> QuoteRecord {
        let session = match self.market_state.as_deref() {
            Some(raw) => MarketSession::from_upstream(raw),
            None => MarketSession::Unknown(String::from("<missing>")),
        };

        QuoteRecord::new(
            symbol,
            session,
            SessionFigures::new(
                self.regular_market_price,
                self.regular_market_change,
                self.regular_market_change_percent,
            ),
        )
        .with_pre_market(SessionFigures::new(
            self.pre_market_price,
            self.pre_market_change,
            self.pre_market_change_percent,
        ))
        .with_post_market(SessionFigures::new(
            self.post_market_price,
            self.post_market_change,
            self.post_market_change_percent,
        ))
    }
}
