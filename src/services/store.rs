use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    error::ValidationError,
    models::{Driver, DriverPatch, NewDriver, NewTrip, Trip, TripPatch},
    services::ids::IdGenerator,
};

/// A record kind kept by the store.
pub trait Record: Clone {
    /// Fields supplied on creation (everything but `id`/`createdAt`).
    type Draft;
    /// Fields merged on update.
    type Patch;

    fn id(&self) -> &str;
    fn from_draft(id: String, created_at: DateTime<Utc>, draft: Self::Draft) -> Self;
    fn apply(&mut self, patch: Self::Patch);
    /// Field rules a stored record must still satisfy.
    fn check(&self) -> Result<(), ValidationError>;
}

impl Record for Trip {
    type Draft = NewTrip;
    type Patch = TripPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, created_at: DateTime<Utc>, draft: NewTrip) -> Self {
        Trip::from_draft(id, created_at, draft)
    }

    fn apply(&mut self, patch: TripPatch) {
        Trip::apply(self, patch)
    }

    fn check(&self) -> Result<(), ValidationError> {
        self.validate()
    }
}

impl Record for Driver {
    type Draft = NewDriver;
    type Patch = DriverPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, created_at: DateTime<Utc>, draft: NewDriver) -> Self {
        Driver::from_draft(id, created_at, draft)
    }

    fn apply(&mut self, patch: DriverPatch) {
        Driver::apply(self, patch)
    }

    fn check(&self) -> Result<(), ValidationError> {
        self.validate()
    }
}

/// Insertion-ordered list of records with unique ids.
#[derive(Debug, Clone)]
pub struct Collection<R> {
    items: Vec<R>,
}

impl<R> Default for Collection<R> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<R: Record> Collection<R> {
    pub fn from_records(items: Vec<R>) -> Self {
        Self { items }
    }

    pub fn push(&mut self, record: R) -> &R {
        self.items.push(record);
        &self.items[self.items.len() - 1]
    }

    /// Merges `patch` into the record with `id`. Returns `false` when no
    /// record matched; that is not an error.
    pub fn update(&mut self, id: &str, patch: R::Patch) -> bool {
        match self.items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                item.apply(patch);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        match self.items.iter().position(|item| item.id() == id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn list(&self) -> &[R] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The authoritative in-memory trips and drivers.
pub struct EntityStore {
    pub trips: Collection<Trip>,
    pub drivers: Collection<Driver>,
    ids: Arc<dyn IdGenerator>,
}

impl EntityStore {
    pub fn new(trips: Vec<Trip>, drivers: Vec<Driver>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            trips: Collection::from_records(trips),
            drivers: Collection::from_records(drivers),
            ids,
        }
    }

    /// Stamps a fresh id and creation time onto `draft`.
    pub fn create<R: Record>(&self, draft: R::Draft) -> R {
        R::from_draft(self.ids.next_id(), Utc::now(), draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ids::SequentialIds;

    fn store() -> EntityStore {
        EntityStore::new(Vec::new(), Vec::new(), Arc::new(SequentialIds::default()))
    }

    fn named(name: &str) -> NewDriver {
        NewDriver {
            name: name.into(),
            phone: String::new(),
        }
    }

    #[test]
    fn push_keeps_insertion_order() {
        let mut store = store();
        for name in ["a", "b", "c"] {
            let driver: Driver = store.create(named(name));
            store.drivers.push(driver);
        }
        let names: Vec<_> = store.drivers.list().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn update_keeps_position_and_unpatched_fields() {
        let mut store = store();
        let first: Driver = store.create(named("a"));
        let second: Driver = store.create(NewDriver {
            name: "b".into(),
            phone: "0500".into(),
        });
        let second_id = second.id.clone();
        store.drivers.push(first);
        store.drivers.push(second);

        assert!(store.drivers.update(
            &second_id,
            DriverPatch {
                name: Some("renamed".into()),
                phone: None,
            }
        ));
        let updated = &store.drivers.list()[1];
        assert_eq!(updated.name, "renamed");
        assert_eq!(updated.phone, "0500");
        assert!(!store.drivers.update("missing", DriverPatch::default()));
    }

    #[test]
    fn remove_is_idempotent() {
        let mut store = store();
        let driver: Driver = store.create(named("a"));
        let id = driver.id.clone();
        store.drivers.push(driver);
        assert!(store.drivers.remove(&id));
        assert!(!store.drivers.remove(&id));
        assert!(store.drivers.is_empty());
    }
}
