use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard,
    },
};

use anyhow::anyhow;
use async_trait::async_trait;

use crate::{
    error::AppError,
    services::persistence::{Slot, SlotStore},
};

#[derive(Default)]
struct Inner {
    slots: HashMap<Slot, String>,
    writes: Vec<(Slot, String)>,
}

/// Process-local slots. Clones share the same contents, and every write is
/// recorded in order.
#[derive(Clone, Default)]
pub struct MemorySlots {
    inner: Arc<Mutex<Inner>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned map is still consistent: every write replaces a whole slot.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Seeds a slot without recording a write.
    pub fn put(&self, slot: Slot, payload: impl Into<String>) {
        self.lock().slots.insert(slot, payload.into());
    }

    pub fn get(&self, slot: Slot) -> Option<String> {
        self.lock().slots.get(&slot).cloned()
    }

    pub fn writes(&self) -> Vec<(Slot, String)> {
        self.lock().writes.clone()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl SlotStore for MemorySlots {
    async fn read_slot(&self, slot: Slot) -> Result<Option<String>, AppError> {
        Ok(self.get(slot))
    }

    async fn write_slot(&self, slot: Slot, payload: &str) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Other(anyhow!("storage unavailable")));
        }
        let mut inner = self.lock();
        inner.slots.insert(slot, payload.to_string());
        inner.writes.push((slot, payload.to_string()));
        Ok(())
    }
}
