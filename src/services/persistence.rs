//! Durable mirror of the trip and driver collections.
//!
//! Each collection lives in its own slot and is always written whole. The
//! in-memory store stays authoritative: slots are only read at startup, and
//! a failed read or write degrades to a [`StorageWarning`] instead of an
//! error.

use std::{collections::HashSet, fmt};

use async_trait::async_trait;
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::{
    error::{AppError, ValidationError},
    models::{default_drivers, Driver, Trip},
    services::store::Record,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Trips,
    Drivers,
}

impl Slot {
    pub fn key(&self) -> &'static str {
        match self {
            Slot::Trips => "taxi-trips",
            Slot::Drivers => "taxi-drivers",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Key-value storage holding one serialized collection per slot.
#[async_trait]
pub trait SlotStore: Send + Sync {
    /// `None` when nothing was ever written to the slot.
    async fn read_slot(&self, slot: Slot) -> Result<Option<String>, AppError>;

    /// Replaces the slot's content.
    async fn write_slot(&self, slot: Slot, payload: &str) -> Result<(), AppError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageWarning {
    pub slot: Slot,
    pub message: String,
}

impl fmt::Display for StorageWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.slot, self.message)
    }
}

/// Collections recovered at startup.
#[derive(Debug, Clone)]
pub struct Restored {
    pub trips: Vec<Trip>,
    pub drivers: Vec<Driver>,
    pub warnings: Vec<StorageWarning>,
}

/// Reads both slots. An absent slot yields the default collection; an
/// unreadable, malformed or invalid one does too, with a warning.
pub async fn load(store: &dyn SlotStore) -> Restored {
    let mut warnings = Vec::new();

    let trips = load_slot(store, Slot::Trips, &mut warnings)
        .await
        .unwrap_or_default();
    let drivers = load_slot(store, Slot::Drivers, &mut warnings)
        .await
        .unwrap_or_else(|| default_drivers(Utc::now()));

    info!(
        trips = trips.len(),
        drivers = drivers.len(),
        warnings = warnings.len(),
        "restored collections"
    );

    Restored {
        trips,
        drivers,
        warnings,
    }
}

async fn load_slot<T: DeserializeOwned + Record>(
    store: &dyn SlotStore,
    slot: Slot,
    warnings: &mut Vec<StorageWarning>,
) -> Option<Vec<T>> {
    let raw = match store.read_slot(slot).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(%slot, "slot empty, using defaults");
            return None;
        }
        Err(err) => {
            warn!(%slot, "failed to read slot: {err}");
            warnings.push(StorageWarning {
                slot,
                message: format!("could not read stored data: {err}"),
            });
            return None;
        }
    };

    let items: Vec<T> = match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(err) => {
            warn!(%slot, "stored data is malformed: {err}");
            warnings.push(StorageWarning {
                slot,
                message: format!("stored data is malformed and was ignored: {err}"),
            });
            return None;
        }
    };

    if let Err(err) = check_records(&items) {
        warn!(%slot, "stored data breaks record rules: {err}");
        warnings.push(StorageWarning {
            slot,
            message: format!("stored data is invalid and was ignored: {err}"),
        });
        return None;
    }
    Some(items)
}

/// Ids must be unique across the collection and every record must pass its
/// own field rules.
fn check_records<T: Record>(items: &[T]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.id()) {
            return Err(ValidationError::DuplicateId(item.id().to_string()));
        }
        item.check()?;
    }
    Ok(())
}

/// Serializes the whole collection and overwrites its slot.
pub async fn save<T: Serialize>(
    store: &dyn SlotStore,
    slot: Slot,
    items: &[T],
) -> Result<(), StorageWarning> {
    let outcome = match serde_json::to_string(items) {
        Ok(payload) => store.write_slot(slot, &payload).await,
        Err(err) => Err(err.into()),
    };

    outcome.map_err(|err| {
        warn!(%slot, "failed to persist collection: {err}");
        StorageWarning {
            slot,
            message: format!("changes are kept in memory but were not saved: {err}"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver(id: &str, name: &str) -> Driver {
        Driver {
            id: id.into(),
            name: name.into(),
            phone: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn repeated_ids_are_rejected() {
        let drivers = [driver("7", "Khaled"), driver("8", "Yusuf"), driver("7", "Omar")];
        assert_eq!(
            check_records(&drivers),
            Err(ValidationError::DuplicateId("7".into()))
        );
        assert!(check_records(&drivers[..2]).is_ok());
    }

    #[test]
    fn records_must_pass_field_rules() {
        assert_eq!(
            check_records(&[driver("1", " ")]),
            Err(ValidationError::MissingField("name"))
        );
    }
}
