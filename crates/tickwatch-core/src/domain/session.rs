use std::fmt::{Display, Formatter};

/// Trading-session phase reported upstream in `marketState`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MarketSession {
    /// `PREPRE`: closed, before the pre-market window opens.
    PreOpen,
    Pre,
    Regular,
    Post,
    /// `POSTPOST`: closed, after the after-hours window ends.
    PostClose,
    Closed,
    /// Any value the mapping does not know; kept verbatim for display.
    Unknown(String),
}

impl MarketSession {
    pub fn from_upstream(raw: &str) -> Self {
        match raw {
            "PREPRE" => Self::PreOpen,
            "PRE" => Self::Pre,
            "REGULAR" => Self::Regular,
            "POST" => Self::Post,
            "POSTPOST" => Self::PostClose,
            "CLOSED" => Self::Closed,
            other => Self::Unknown(other.to_owned()),
        }
    }

    /// PRE-OPEN, POST-CLOSE and CLOSED render muted and take their trend
    /// from the sign of the change percent.
    pub const fn is_closed_class(&self) -> bool {
        matches!(self, Self::PreOpen | Self::PostClose | Self::Closed)
    }

    /// Bracketed label shown in the MARKET column.
    pub fn label(&self) -> String {
        match self {
            Self::PreOpen | Self::PostClose | Self::Closed => String::from("[CLOSED]"),
            Self::Pre => String::from("[PRE-MARKET]"),
            Self::Regular => String::from("[OPEN]"),
            Self::Post => String::from("[AFTER-HOURS]"),
            Self::Unknown(raw) => format!("[??? {raw}]"),
        }
    }
}

impl Display for MarketSession {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PreOpen => f.write_str("PRE-OPEN"),
            Self::Pre => f.write_str("PRE"),
            Self::Regular => f.write_str("REGULAR"),
            Self::Post => f.write_str("POST"),
            Self::PostClose => f.write_str("POST-CLOSE"),
            Self::Closed => f.write_str("CLOSED"),
            Self::Unknown(raw) => write!(f, "UNKNOWN({raw})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_upstream_states() {
        assert_eq!(MarketSession::from_upstream("PREPRE"), MarketSession::PreOpen);
        assert_eq!(MarketSession::from_upstream("POSTPOST"), MarketSession::PostClose);
        assert_eq!(
            MarketSession::from_upstream("HALTED"),
            MarketSession::Unknown(String::from("HALTED"))
        );
    }

    #[test]
    fn closed_class_shares_one_label() {
        for session in [
            MarketSession::PreOpen,
            MarketSession::PostClose,
            MarketSession::Closed,
        ] {
            assert!(session.is_closed_class());
            assert_eq!(session.label(), "[CLOSED]");
        }
        assert!(!MarketSession::Regular.is_closed_class());
        assert_eq!(MarketSession::Unknown(String::from("X")).label(), "[??? X]");
    }
}
