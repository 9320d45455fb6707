//! Trading pairs the order form accepts.

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Supported spot pair, quoted in USDT.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Symbol {
    #[default]
    BtcUsdt,
    EthUsdt,
    BnbUsdt,
    SolUsdt,
    XrpUsdt,
}

impl Symbol {
    /// Every supported pair, in the order the order form cycles through them.
    pub const ALL: [Symbol; 5] = [
        Symbol::BtcUsdt,
        Symbol::EthUsdt,
        Symbol::BnbUsdt,
        Symbol::SolUsdt,
        Symbol::XrpUsdt,
    ];

    /// Wire name, e.g. `"BTCUSDT"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Symbol::BtcUsdt => "BTCUSDT",
            Symbol::EthUsdt => "ETHUSDT",
            Symbol::BnbUsdt => "BNBUSDT",
            Symbol::SolUsdt => "SOLUSDT",
            Symbol::XrpUsdt => "XRPUSDT",
        }
    }

    pub fn base_asset(self) -> &'static str {
        match self {
            Symbol::BtcUsdt => "BTC",
            Symbol::EthUsdt => "ETH",
            Symbol::BnbUsdt => "BNB",
            Symbol::SolUsdt => "SOL",
            Symbol::XrpUsdt => "XRP",
        }
    }

    pub fn quote_asset(self) -> &'static str {
        "USDT"
    }

    /// Next pair in [`Symbol::ALL`], wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Symbol {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|sym| sym.as_str() == wanted)
            .ok_or_else(|| ValidationError::UnknownSymbol(s.to_string()))
    }
}
