use crate::{MarketSession, Symbol};

/// Price and change figures for one trading session. Any field may be
/// missing upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionFigures {
    pub price: Option<f64>,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
}

impl SessionFigures {
    pub const fn new(price: Option<f64>, change: Option<f64>, change_percent: Option<f64>) -> Self {
        Self {
            price,
            change,
            change_percent,
        }
    }

    /// Dedicated pre/post figures only count when both price and percent came through.
    const fn is_complete(&self) -> bool {
        self.price.is_some() && self.change_percent.is_some()
    }
}

/// One symbol's quote as returned by a quote source.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRecord {
    pub symbol: Symbol,
    pub session: MarketSession,
    pub regular: SessionFigures,
    pub pre_market: SessionFigures,
    pub post_market: SessionFigures,
}

impl QuoteRecord {
    pub fn new(symbol: Symbol, session: MarketSession, regular: SessionFigures) -> Self {
        Self {
            symbol,
            session,
            regular,
            pre_market: SessionFigures::default(),
            post_market: SessionFigures::default(),
        }
    }

    pub fn with_pre_market(mut self, figures: SessionFigures) -> Self {
        self.pre_market = figures;
        self
    }

    pub fn with_post_market(mut self, figures: SessionFigures) -> Self {
        self.post_market = figures;
        self
    }

    /// Figures for the session currently in effect. PRE and POST use their
    /// dedicated fields and fall back to the regular ones when upstream
    /// omitted them.
    pub fn active(&self) -> SessionFigures {
        let dedicated = match self.session {
            MarketSession::Pre => Some(self.pre_market),
            MarketSession::Post => Some(self.post_market),
            _ => None,
        };

        match dedicated {
            Some(figures) if figures.is_complete() => figures,
            _ => self.regular,
        }
    }

    /// Price for the active session, if it is a usable number.
    pub fn active_price(&self) -> Option<f64> {
        self.active().price.filter(|price| price.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(session: MarketSession) -> QuoteRecord {
        QuoteRecord::new(
            Symbol::parse("NOK").expect("valid symbol"),
            session,
            SessionFigures::new(Some(4.10), Some(0.05), Some(1.23)),
        )
    }

    #[test]
    fn pre_session_uses_pre_market_fields() {
        let quote = record(MarketSession::Pre)
            .with_pre_market(SessionFigures::new(Some(4.20), Some(0.10), Some(2.44)));
        assert_eq!(quote.active().price, Some(4.20));
        assert_eq!(quote.active().change_percent, Some(2.44));
    }

    #[test]
    fn post_session_falls_back_when_dedicated_fields_missing() {
        let quote = record(MarketSession::Post)
            .with_post_market(SessionFigures::new(Some(4.30), None, None));
        assert_eq!(quote.active().price, Some(4.10));
        assert_eq!(quote.active().change_percent, Some(1.23));
    }

    #[test]
    fn regular_session_ignores_extended_hours_fields() {
        let quote = record(MarketSession::Regular)
            .with_post_market(SessionFigures::new(Some(9.0), Some(1.0), Some(9.0)));
        assert_eq!(quote.active_price(), Some(4.10));
    }

    #[test]
    fn non_finite_price_is_not_usable() {
        let quote = QuoteRecord::new(
            Symbol::parse("GME").expect("valid symbol"),
            MarketSession::Regular,
            SessionFigures::new(Some(f64::NAN), None, None),
        );
        assert_eq!(quote.active_price(), None);
    }
}
