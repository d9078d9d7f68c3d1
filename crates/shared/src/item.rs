use crate::error::{DomainError, DomainResult};
use crate::unit::MeasurementUnit;

/// Name/quantity/unit triple shared by inventory and shopping items.
///
/// The owning entity is responsible for bumping its own update timestamp
/// after a successful mutation here.
#[derive(Debug, Clone, PartialEq)]
pub struct StockItem {
    name: String,
    quantity: f64,
    unit: MeasurementUnit,
}

impl StockItem {
    pub fn new(name: &str, quantity: f64, unit: MeasurementUnit) -> DomainResult<Self> {
        let mut item = Self {
            name: String::new(),
            quantity: 0.0,
            unit,
        };
        item.set_name(name)?;
        item.set_quantity(quantity)?;
        Ok(item)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn unit(&self) -> MeasurementUnit {
        self.unit
    }

    pub fn set_name(&mut self, name: &str) -> DomainResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name must not be empty"));
        }
        self.name = name.to_owned();
        Ok(())
    }

    pub fn set_quantity(&mut self, quantity: f64) -> DomainResult<()> {
        if quantity < 0.0 {
            return Err(DomainError::validation("quantity must not be negative"));
        }
        self.quantity = quantity;
        Ok(())
    }

    pub fn set_unit(&mut self, unit: MeasurementUnit) {
        self.unit = unit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed_on_set() {
        let item = StockItem::new("  Milk  ", 1.0, MeasurementUnit::Liter).unwrap();
        assert_eq!(item.name(), "Milk");
        assert_eq!(item.quantity(), 1.0);
        assert_eq!(item.unit(), MeasurementUnit::Liter);
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = StockItem::new("   ", 1.0, MeasurementUnit::Piece).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn negative_quantity_is_rejected_and_state_unchanged() {
        let mut item = StockItem::new("Eggs", 6.0, MeasurementUnit::Piece).unwrap();
        let err = item.set_quantity(-1.0).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(item.quantity(), 6.0);
    }

    #[test]
    fn zero_quantity_is_allowed() {
        let item = StockItem::new("Flour", 0.0, MeasurementUnit::Kilogram).unwrap();
        assert_eq!(item.quantity(), 0.0);
    }
}
