use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{
    error::ValidationError,
    models::{
        Driver, DriverPatch, DriverRevenue, MonthlyRevenue, NewDriver, NewTrip, Revenue, Summary,
        Trip, TripPatch,
    },
    services::{
        export::{self, ExportTable},
        ids::IdGenerator,
        persistence::{self, Slot, SlotStore, StorageWarning},
        search, stats,
        store::EntityStore,
    },
};

/// Result of a mutation that has been applied in memory. `warnings` lists
/// persistence problems; the mutation stands regardless.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Committed<T> {
    pub value: T,
    #[serde(serialize_with = "warning_messages")]
    pub warnings: Vec<StorageWarning>,
}

fn warning_messages<S: serde::Serializer>(
    warnings: &[StorageWarning],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(warnings.iter().map(ToString::to_string))
}

/// Trips and drivers for the whole process.
///
/// All mutations go through one lock and write their collection to the
/// slot store before releasing it, so slot writes follow mutation order.
/// Reads work on a cloned snapshot.
#[derive(Clone)]
pub struct Ledger {
    store: Arc<Mutex<EntityStore>>,
    slots: Arc<dyn SlotStore>,
}

impl Ledger {
    /// Restores both collections from `slots`. The returned warnings
    /// describe slots that could not be used.
    pub async fn open(
        slots: Arc<dyn SlotStore>,
        ids: Arc<dyn IdGenerator>,
    ) -> (Self, Vec<StorageWarning>) {
        let restored = persistence::load(slots.as_ref()).await;
        let store = EntityStore::new(restored.trips, restored.drivers, ids);
        let ledger = Self {
            store: Arc::new(Mutex::new(store)),
            slots,
        };
        (ledger, restored.warnings)
    }

    async fn persist<T: Serialize>(&self, slot: Slot, items: &[T]) -> Vec<StorageWarning> {
        match persistence::save(self.slots.as_ref(), slot, items).await {
            Ok(()) => Vec::new(),
            Err(warning) => vec![warning],
        }
    }

    pub async fn add_trip(&self, draft: NewTrip) -> Result<Committed<Trip>, ValidationError> {
        draft.validate()?;
        let mut store = self.store.lock().await;
        let trip: Trip = store.create(draft);
        store.trips.push(trip.clone());
        debug!(id = %trip.id, "trip added");
        let warnings = self.persist(Slot::Trips, store.trips.list()).await;
        Ok(Committed {
            value: trip,
            warnings,
        })
    }

    /// Returns `false` in `value` when no trip has `id`; nothing is written then.
    pub async fn update_trip(
        &self,
        id: &str,
        patch: TripPatch,
    ) -> Result<Committed<bool>, ValidationError> {
        patch.validate()?;
        let mut store = self.store.lock().await;
        if !store.trips.update(id, patch) {
            debug!(%id, "update for unknown trip ignored");
            return Ok(untouched());
        }
        debug!(%id, "trip updated");
        let warnings = self.persist(Slot::Trips, store.trips.list()).await;
        Ok(Committed {
            value: true,
            warnings,
        })
    }

    pub async fn delete_trip(&self, id: &str) -> Committed<bool> {
        let mut store = self.store.lock().await;
        if !store.trips.remove(id) {
            return untouched();
        }
        debug!(%id, "trip deleted");
        let warnings = self.persist(Slot::Trips, store.trips.list()).await;
        Committed {
            value: true,
            warnings,
        }
    }

    pub async fn add_driver(&self, draft: NewDriver) -> Result<Committed<Driver>, ValidationError> {
        draft.validate()?;
        let mut store = self.store.lock().await;
        let driver: Driver = store.create(draft);
        store.drivers.push(driver.clone());
        debug!(id = %driver.id, "driver added");
        let warnings = self.persist(Slot::Drivers, store.drivers.list()).await;
        Ok(Committed {
            value: driver,
            warnings,
        })
    }

    /// Renaming a driver does not touch trips booked under the old name.
    pub async fn update_driver(
        &self,
        id: &str,
        patch: DriverPatch,
    ) -> Result<Committed<bool>, ValidationError> {
        patch.validate()?;
        let mut store = self.store.lock().await;
        if !store.drivers.update(id, patch) {
            debug!(%id, "update for unknown driver ignored");
            return Ok(untouched());
        }
        debug!(%id, "driver updated");
        let warnings = self.persist(Slot::Drivers, store.drivers.list()).await;
        Ok(Committed {
            value: true,
            warnings,
        })
    }

    pub async fn delete_driver(&self, id: &str) -> Committed<bool> {
        let mut store = self.store.lock().await;
        if !store.drivers.remove(id) {
            return untouched();
        }
        info!(%id, "driver deleted");
        let warnings = self.persist(Slot::Drivers, store.drivers.list()).await;
        Committed {
            value: true,
            warnings,
        }
    }

    pub async fn trips(&self) -> Vec<Trip> {
        self.store.lock().await.trips.list().to_vec()
    }

    pub async fn drivers(&self) -> Vec<Driver> {
        self.store.lock().await.drivers.list().to_vec()
    }

    pub async fn trip(&self, id: &str) -> Option<Trip> {
        self.store.lock().await.trips.get(id).cloned()
    }

    pub async fn driver(&self, id: &str) -> Option<Driver> {
        self.store.lock().await.drivers.get(id).cloned()
    }

    async fn snapshot(&self) -> (Vec<Trip>, Vec<Driver>) {
        let store = self.store.lock().await;
        (store.trips.list().to_vec(), store.drivers.list().to_vec())
    }

    pub async fn search_trips(&self, query: &str) -> Vec<Trip> {
        let store = self.store.lock().await;
        search::search_trips(store.trips.list(), query)
    }

    pub async fn day_revenue(&self, date: &str) -> Revenue {
        stats::day_revenue(&self.trips().await, date)
    }

    pub async fn period_revenue(&self, start: &str, end: &str) -> Result<Revenue, ValidationError> {
        stats::period_revenue(&self.trips().await, start, end)
    }

    pub async fn driver_revenue_by_day(&self, date: &str) -> Vec<DriverRevenue> {
        let (trips, drivers) = self.snapshot().await;
        stats::driver_revenue_by_day(&trips, &drivers, date)
    }

    pub async fn driver_revenue_by_period(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<DriverRevenue>, ValidationError> {
        let (trips, drivers) = self.snapshot().await;
        stats::driver_revenue_by_period(&trips, &drivers, start, end)
    }

    pub async fn driver_leaderboard(&self) -> Vec<DriverRevenue> {
        let (trips, drivers) = self.snapshot().await;
        stats::driver_leaderboard(&trips, &drivers)
    }

    pub async fn best_driver(&self) -> Option<DriverRevenue> {
        let (trips, drivers) = self.snapshot().await;
        stats::best_driver(&trips, &drivers)
    }

    pub async fn driver_performance(&self) -> Vec<DriverRevenue> {
        let (trips, drivers) = self.snapshot().await;
        stats::driver_performance(&trips, &drivers)
    }

    pub async fn summary(&self, today: NaiveDate) -> Summary {
        let (trips, drivers) = self.snapshot().await;
        stats::summary(&trips, &drivers, today)
    }

    pub async fn monthly_revenue(
        &self,
        today: NaiveDate,
        months: u32,
    ) -> Result<Vec<MonthlyRevenue>, ValidationError> {
        stats::monthly_revenue(&self.trips().await, today, months)
    }

    pub async fn daily_trips_export(&self, date: &str) -> Result<ExportTable, ValidationError> {
        export::daily_trips(&self.trips().await, date)
    }

    pub async fn all_trips_export(&self) -> Result<ExportTable, ValidationError> {
        export::all_trips(&self.trips().await)
    }
}

fn untouched() -> Committed<bool> {
    Committed {
        value: false,
        warnings: Vec::new(),
    }
}
