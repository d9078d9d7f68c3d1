use chrono::{DateTime, Utc};
use culina_shared::{DomainError, DomainResult, EntityId, EntityMeta};

/// A recipe label. Referenced from recipes by id only; name uniqueness is
/// enforced by the application service, which has repository access.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    meta: EntityMeta,
    name: String,
    description: Option<String>,
    icon_name: Option<String>,
}

impl Category {
    pub fn new(name: &str, now: DateTime<Utc>) -> DomainResult<Self> {
        let mut category = Self {
            meta: EntityMeta::new(now),
            name: String::new(),
            description: None,
            icon_name: None,
        };
        category.set_name(name, now)?;
        Ok(category)
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

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn icon_name(&self) -> Option<&str> {
        self.icon_name.as_deref()
    }

    pub fn set_name(&mut self, name: &str, now: DateTime<Utc>) -> DomainResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("category name must not be empty"));
        }
        self.name = name.to_owned();
        self.meta.touch(now);
        Ok(())
    }

    pub fn set_description(&mut self, description: Option<&str>, now: DateTime<Utc>) {
        self.description = description.map(|d| d.trim().to_owned());
        self.meta.touch(now);
    }

    pub fn set_icon_name(&mut self, icon_name: Option<&str>, now: DateTime<Utc>) {
        self.icon_name = icon_name.map(str::to_owned);
        self.meta.touch(now);
    }

    pub fn assign_id(&mut self, id: EntityId) {
        self.meta.assign_id(id);
    }
}
