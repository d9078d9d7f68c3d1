use chrono::{DateTime, Utc};

/// Identity assigned by the persistence layer. Zero means "not persisted
/// yet".
pub type EntityId = i64;

/// Identity and audit timestamps shared by every entity.
///
/// Invariant: `updated_at >= created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMeta {
    id: EntityId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EntityMeta {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    /// Bumps the update timestamp. Called by every mutating operation of
    /// the owning entity.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }

    /// Hands out the identity. Reserved for the persistence layer; ignores
    /// entities that already have one.
    pub fn assign_id(&mut self, id: EntityId) {
        if self.id == 0 {
            self.id = id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn touch_never_moves_before_creation() {
        let created = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let mut meta = EntityMeta::new(created);

        meta.touch(created - chrono::TimeDelta::hours(1));
        assert_eq!(meta.updated_at(), created);

        let later = created + chrono::TimeDelta::hours(1);
        meta.touch(later);
        assert_eq!(meta.updated_at(), later);
    }

    #[test]
    fn assign_id_is_one_shot() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let mut meta = EntityMeta::new(now);
        assert!(!meta.is_persisted());

        meta.assign_id(7);
        meta.assign_id(9);
        assert_eq!(meta.id(), 7);
        assert!(meta.is_persisted());
    }
}
