//! Per-asset balances as reported by the gateway.
//!
//! Amounts arrive as decimal strings; they are parsed into exact
//! [`Decimal`]s here and must be non-negative. A [`Balances`]
//! collection is keyed by asset and preserves arrival order.

use std::str::FromStr;

use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::error::ValidationError;

/// Fractional digits used when rendering amounts.
pub const DISPLAY_SCALE: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    pub asset: String,
    pub free: Decimal,
    pub locked: Decimal,
}

impl Balance {
    /// Build a balance row from the gateway's string amounts.
    pub fn parse(asset: impl Into<String>, free: &str, locked: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            asset: asset.into(),
            free: parse_amount("free", free)?,
            locked: parse_amount("locked", locked)?,
        })
    }

    pub fn total(&self) -> Decimal {
        self.free + self.locked
    }
}

/// Render an amount with [`DISPLAY_SCALE`] fractional digits, e.g. `0.50000000`.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.*}", DISPLAY_SCALE, amount)
}

fn parse_amount(field: &'static str, input: &str) -> Result<Decimal, ValidationError> {
    let text = input.trim();
    let value = Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| ValidationError::InvalidAmount {
            field,
            input: input.to_string(),
        })?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::Negative { field });
    }
    Ok(value)
}

/// Balance rows keyed by asset, in the order the gateway sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Balances {
    rows: IndexMap<String, Balance>,
}

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect rows; a repeated asset keeps its first position and its
    /// last value.
    pub fn from_rows(rows: impl IntoIterator<Item = Balance>) -> Self {
        let mut map = IndexMap::new();
        for row in rows {
            map.insert(row.asset.clone(), row);
        }
        Self { rows: map }
    }

    pub fn get(&self, asset: &str) -> Option<&Balance> {
        self.rows.get(asset)
    }

    /// Free amount for `asset`, zero when the asset is absent.
    pub fn free(&self, asset: &str) -> Decimal {
        self.rows.get(asset).map(|b| b.free).unwrap_or(Decimal::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Balance> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_with_eight_digits() {
        let b = Balance::parse("BTC", "0.5", "0.0").unwrap();
        assert_eq!(format_amount(b.free), "0.50000000");
        assert_eq!(format_amount(b.locked), "0.00000000");
        assert_eq!(format_amount(b.total()), "0.50000000");
    }

    #[test]
    fn rejects_negative_and_garbage_amounts() {
        assert_eq!(
            Balance::parse("ETH", "-1", "0"),
            Err(ValidationError::Negative { field: "free" })
        );
        assert!(matches!(
            Balance::parse("ETH", "1", "lots"),
            Err(ValidationError::InvalidAmount { field: "locked", .. })
        ));
    }

    #[test]
    fn accepts_negative_zero_and_scientific() {
        let b = Balance::parse("XRP", "-0", "1e-8").unwrap();
        assert!(b.free.is_zero());
        assert_eq!(format_amount(b.locked), "0.00000001");
    }

    #[test]
    fn keeps_arrival_order() {
        let balances = Balances::from_rows(vec![
            Balance::parse("USDT", "100.0", "0.0").unwrap(),
            Balance::parse("BTC", "0.01", "0.0").unwrap(),
            Balance::parse("ETH", "2", "0.5").unwrap(),
        ]);
        let assets: Vec<&str> = balances.iter().map(|b| b.asset.as_str()).collect();
        assert_eq!(assets, ["USDT", "BTC", "ETH"]);
        assert_eq!(balances.free("SOL"), Decimal::ZERO);
    }

    #[test]
    fn repeated_asset_keeps_position_and_last_value() {
        let balances = Balances::from_rows(vec![
            Balance::parse("BTC", "1", "0").unwrap(),
            Balance::parse("USDT", "5", "0").unwrap(),
            Balance::parse("BTC", "2", "0").unwrap(),
        ]);
        assert_eq!(balances.len(), 2);
        assert_eq!(balances.iter().next().unwrap().asset, "BTC");
        assert_eq!(balances.free("BTC"), Decimal::from(2));
    }
}
