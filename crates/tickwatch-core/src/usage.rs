use std::fmt::{Display, Formatter};

/// Cumulative bytes of quote payloads received since process start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageCounter {
    bytes: u64,
}

impl UsageCounter {
    pub const fn new() -> Self {
        Self { bytes: 0 }
    }

    pub fn add(&mut self, bytes: u64) {
        self.bytes = self.bytes.saturating_add(bytes);
    }

    pub const fn bytes(&self) -> u64 {
        self.bytes
    }
}

impl Display for UsageCounter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_usage(self.bytes))
    }
}

/// Decimal units with one decimal place. Anything under a megabyte is shown
/// in KB, so even a handful of bytes reads `0.0 KB`.
pub fn format_usage(bytes: u64) -> String {
    let value = bytes as f64;
    let (scaled, suffix) = if value >= 1e9 {
        (value / 1e9, "GB")
    } else if value >= 1e6 {
        (value / 1e6, "MB")
    } else {
        (value / 1e3, "KB")
    };

    format!("{scaled:.1} {suffix}")
}
