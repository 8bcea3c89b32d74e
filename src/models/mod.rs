pub mod driver;
pub mod stats;
pub mod trip;

pub use driver::{default_drivers, Driver, DriverPatch, NewDriver};
pub use stats::{DriverRevenue, MonthlyRevenue, Revenue, Summary};
pub use trip::{NewTrip, Trip, TripPatch};
