use chrono::{DateTime, Utc};
use culina_shared::{DomainError, DomainResult, EntityId, EntityMeta, MeasurementUnit};

/// An ingredient owned by exactly one recipe. Lives and dies with it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeIngredient {
    meta: EntityMeta,
    name: String,
    amount: f64,
    unit: MeasurementUnit,
    is_optional: bool,
    notes: Option<String>,
}

impl RecipeIngredient {
    pub(crate) fn new(
        name: &str,
        amount: f64,
        unit: MeasurementUnit,
        is_optional: bool,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let mut ingredient = Self {
            meta: EntityMeta::new(now),
            name: String::new(),
            amount: 0.0,
            unit,
            is_optional,
            notes: notes.map(|n| n.trim().to_owned()),
        };
        ingredient.set_name(name, now)?;
        ingredient.set_amount(amount, now)?;
        Ok(ingredient)
    }

    pub fn id(&self) -> EntityId {
        self.meta.id()
    }

    pub fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn unit(&self) -> MeasurementUnit {
        self.unit
    }

    pub fn is_optional(&self) -> bool {
        self.is_optional
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn set_name(&mut self, name: &str, now: DateTime<Utc>) -> DomainResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("ingredient name must not be empty"));
        }
        self.name = name.to_owned();
        self.meta.touch(now);
        Ok(())
    }

    pub fn set_amount(&mut self, amount: f64, now: DateTime<Utc>) -> DomainResult<()> {
        if amount <= 0.0 {
            return Err(DomainError::validation(
                "ingredient amount must be positive",
            ));
        }
        self.amount = amount;
        self.meta.touch(now);
        Ok(())
    }

    pub fn set_unit(&mut self, unit: MeasurementUnit, now: DateTime<Utc>) {
        self.unit = unit;
        self.meta.touch(now);
    }

    pub fn set_optional(&mut self, is_optional: bool, now: DateTime<Utc>) {
        self.is_optional = is_optional;
        self.meta.touch(now);
    }

    pub fn set_notes(&mut self, notes: Option<&str>, now: DateTime<Utc>) {
        self.notes = notes.map(|n| n.trim().to_owned());
        self.meta.touch(now);
    }

    pub(crate) fn assign_id(&mut self, id: EntityId) {
        self.meta.assign_id(id);
    }
}
