pub mod export;
pub mod ids;
pub mod kv;
pub mod ledger;
pub mod memory;
pub mod persistence;
pub mod search;
pub mod stats;
pub mod storage;
pub mod store;

pub use ledger::{Committed, Ledger};
pub use persistence::{Slot, SlotStore, StorageWarning};
