//! The order draft and the form that edits it.
//!
//! Editing is pure local mutation: numeric fields are kept as the text
//! the user typed and only parsed by [`OrderForm::validate`]. A failed
//! submission leaves the draft untouched so it can be sent again.

use crate::error::ValidationError;
use crate::order::{parse_positive, OrderField, OrderRequest};
use crate::order_type::OrderType;
use crate::side::Side;
use crate::symbol::Symbol;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderDraft {
    pub symbol: Symbol,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity: String,
    pub price: String,
}

#[derive(Debug, Clone, Default)]
pub struct OrderForm {
    draft: OrderDraft,
}

impl OrderForm {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            draft: OrderDraft {
                symbol,
                ..OrderDraft::default()
            },
        }
    }

    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    /// Set one field from its textual form.
    ///
    /// Symbol, side and type must name a known value; quantity and
    /// price are stored verbatim.
    pub fn update_field(&mut self, field: OrderField, value: &str) -> Result<(), ValidationError> {
        match field {
            OrderField::Symbol => self.draft.symbol = value.parse()?,
            OrderField::Side => self.draft.side = value.parse()?,
            OrderField::Type => self.draft.order_type = value.parse()?,
            OrderField::Quantity => self.draft.quantity = value.to_string(),
            OrderField::Price => self.draft.price = value.to_string(),
        }
        Ok(())
    }

    pub fn set_side(&mut self, side: Side) {
        self.draft.side = side;
    }

    pub fn cycle_symbol(&mut self) {
        self.draft.symbol = self.draft.symbol.next();
    }

    pub fn toggle_order_type(&mut self) {
        self.draft.order_type = self.draft.order_type.toggled();
    }

    /// Mutable access to a text field, for character-by-character editing.
    pub fn text_mut(&mut self, field: OrderField) -> Option<&mut String> {
        match field {
            OrderField::Quantity => Some(&mut self.draft.quantity),
            OrderField::Price => Some(&mut self.draft.price),
            _ => None,
        }
    }

    /// Snapshot the draft into a validated [`OrderRequest`].
    ///
    /// The price text is ignored for market orders.
    pub fn validate(&self) -> Result<OrderRequest, ValidationError> {
        let d = &self.draft;
        let quantity = parse_positive(OrderField::Quantity, &d.quantity)?;
        let price = if d.order_type.requires_price() {
            if d.price.trim().is_empty() {
                return Err(ValidationError::MissingPrice);
            }
            Some(parse_positive(OrderField::Price, &d.price)?)
        } else {
            None
        };
        OrderRequest::new(d.symbol, d.side, d.order_type, quantity, price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn update_field_parses_enums_and_keeps_text() {
        let mut form = OrderForm::default();
        form.update_field(OrderField::Symbol, "ethusdt").unwrap();
        form.update_field(OrderField::Side, "SELL").unwrap();
        form.update_field(OrderField::Type, "limit").unwrap();
        form.update_field(OrderField::Quantity, "1.5x").unwrap();
        assert_eq!(form.draft().symbol, Symbol::EthUsdt);
        assert_eq!(form.draft().side, Side::Sell);
        assert_eq!(form.draft().order_type, OrderType::Limit);
        assert_eq!(form.draft().quantity, "1.5x");
    }

    #[test]
    fn rejected_enum_value_leaves_draft_unchanged() {
        let mut form = OrderForm::new(Symbol::BnbUsdt);
        let before = form.draft().clone();
        assert!(form.update_field(OrderField::Side, "short").is_err());
        assert!(form.update_field(OrderField::Symbol, "BTCEUR").is_err());
        assert_eq!(form.draft(), &before);
    }

    #[test]
    fn invalid_quantity_is_a_field_error_not_nan() {
        let mut form = OrderForm::default();
        form.update_field(OrderField::Quantity, "abc").unwrap();
        assert!(matches!(
            form.validate(),
            Err(ValidationError::InvalidNumber { field: OrderField::Quantity, .. })
        ));
    }

    #[test]
    fn market_order_ignores_stale_price_text() {
        let mut form = OrderForm::default();
        form.update_field(OrderField::Price, "123").unwrap();
        form.update_field(OrderField::Quantity, "0.001").unwrap();
        let order = form.validate().unwrap();
        assert_eq!(order.order_type(), OrderType::Market);
        assert_eq!(order.price(), None);
    }

    #[test]
    fn limit_order_needs_valid_price() {
        let mut form = OrderForm::default();
        form.toggle_order_type();
        form.update_field(OrderField::Quantity, "2").unwrap();
        assert_eq!(form.validate(), Err(ValidationError::MissingPrice));

        form.update_field(OrderField::Price, "-3").unwrap();
        assert_eq!(
            form.validate(),
            Err(ValidationError::NonPositive { field: OrderField::Price })
        );

        form.update_field(OrderField::Price, "64000.5").unwrap();
        let order = form.validate().unwrap();
        assert_eq!(order.price(), Some(Decimal::new(640005, 1)));
    }

    #[test]
    fn text_mut_only_exposes_numeric_fields() {
        let mut form = OrderForm::default();
        form.text_mut(OrderField::Quantity).unwrap().push('3');
        assert_eq!(form.draft().quantity, "3");
        assert!(form.text_mut(OrderField::Side).is_none());
    }
}
