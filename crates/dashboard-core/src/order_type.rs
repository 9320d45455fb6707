//! Order type (Market vs Limit).
//!
//! A `Limit` order carries a price, a `Market` order never does.

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum OrderType {
    #[default]
    Market,
    Limit,
}

impl OrderType {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
        }
    }

    pub fn requires_price(self) -> bool {
        matches!(self, OrderType::Limit)
    }

    pub fn toggled(self) -> Self {
        match self {
            OrderType::Market => OrderType::Limit,
            OrderType::Limit => OrderType::Market,
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MARKET" => Ok(OrderType::Market),
            "LIMIT" => Ok(OrderType::Limit),
            _ => Err(ValidationError::UnknownOrderType(s.to_string())),
        }
    }
}
