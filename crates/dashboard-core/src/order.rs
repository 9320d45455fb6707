//! Validated order snapshot sent to the gateway.
//!
//! An [`OrderRequest`] can only be built through [`OrderRequest::new`],
//! so every value that reaches the gateway has a strictly positive
//! quantity and a price exactly when the order type calls for one.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::order_type::OrderType;
use crate::side::Side;
use crate::symbol::Symbol;

/// Editable fields of the order draft.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OrderField {
    Symbol,
    Side,
    Type,
    Quantity,
    Price,
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderField::Symbol => "symbol",
            OrderField::Side => "side",
            OrderField::Type => "type",
            OrderField::Quantity => "quantity",
            OrderField::Price => "price",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    symbol: Symbol,
    side: Side,
    order_type: OrderType,
    quantity: Decimal,
    price: Option<Decimal>,
}

impl OrderRequest {
    pub fn new(
        symbol: Symbol,
        side: Side,
        order_type: OrderType,
        quantity: Decimal,
        price: Option<Decimal>,
    ) -> Result<Self, ValidationError> {
        ensure_positive(OrderField::Quantity, quantity)?;
        match (order_type.requires_price(), price) {
            (true, None) => return Err(ValidationError::MissingPrice),
            (false, Some(_)) => return Err(ValidationError::UnexpectedPrice),
            (true, Some(p)) => ensure_positive(OrderField::Price, p)?,
            (false, None) => {}
        }
        Ok(Self {
            symbol,
            side,
            order_type,
            quantity,
            price,
        })
    }

    /// Shorthand for a market order.
    pub fn market(symbol: Symbol, side: Side, quantity: Decimal) -> Result<Self, ValidationError> {
        Self::new(symbol, side, OrderType::Market, quantity, None)
    }

    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn price(&self) -> Option<Decimal> {
        self.price
    }
}

impl fmt::Display for OrderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.order_type, self.side, self.quantity, self.symbol)?;
        if let Some(price) = self.price {
            write!(f, " @ {}", price)?;
        }
        Ok(())
    }
}

/// Parse user-entered text as a strictly positive decimal.
///
/// Anything that is not a plain (or scientific) decimal, including
/// `NaN` and `inf`, is an [`ValidationError::InvalidNumber`].
pub fn parse_positive(field: OrderField, input: &str) -> Result<Decimal, ValidationError> {
    let text = input.trim();
    let value = Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| ValidationError::InvalidNumber {
            field,
            input: input.to_string(),
        })?;
    ensure_positive(field, value)?;
    Ok(value)
}

fn ensure_positive(field: OrderField, value: Decimal) -> Result<(), ValidationError> {
    if value.is_zero() || value.is_sign_negative() {
        Err(ValidationError::NonPositive { field })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_order_without_price() {
        let qty = Decimal::new(1, 3);
        let order = OrderRequest::market(Symbol::BtcUsdt, Side::Buy, qty).unwrap();
        assert_eq!(order.quantity(), qty);
        assert_eq!(order.price(), None);
        assert_eq!(order.to_string(), "MARKET BUY 0.001 BTCUSDT");
    }

    #[test]
    fn price_must_match_order_type() {
        let qty = Decimal::ONE;
        assert_eq!(
            OrderRequest::new(Symbol::EthUsdt, Side::Sell, OrderType::Limit, qty, None),
            Err(ValidationError::MissingPrice)
        );
        assert_eq!(
            OrderRequest::new(Symbol::EthUsdt, Side::Sell, OrderType::Market, qty, Some(Decimal::TEN)),
            Err(ValidationError::UnexpectedPrice)
        );
        assert_eq!(
            OrderRequest::new(Symbol::EthUsdt, Side::Sell, OrderType::Limit, qty, Some(Decimal::ZERO)),
            Err(ValidationError::NonPositive { field: OrderField::Price })
        );
    }

    #[test]
    fn parse_positive_rejects_non_numbers() {
        for bad in ["", "abc", "NaN", "inf", "1.2.3"] {
            assert!(
                matches!(
                    parse_positive(OrderField::Quantity, bad),
                    Err(ValidationError::InvalidNumber { field: OrderField::Quantity, .. })
                ),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn parse_positive_rejects_zero_and_negative() {
        for bad in ["0", "0.000", "-1", "-0.5"] {
            assert_eq!(
                parse_positive(OrderField::Quantity, bad),
                Err(ValidationError::NonPositive { field: OrderField::Quantity })
            );
        }
        assert_eq!(
            parse_positive(OrderField::Quantity, " 0.001 ").unwrap(),
            Decimal::new(1, 3)
        );
    }
}
