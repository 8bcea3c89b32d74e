use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::fs;

use crate::{
    error::AppError,
    services::persistence::{Slot, SlotStore},
};

/// Keeps each slot as `<root>/<key>.json`.
#[derive(Clone)]
pub struct JsonFileSlots {
    root: Arc<PathBuf>,
}

impl JsonFileSlots {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_structure(&self) -> Result<(), AppError> {
        fs::create_dir_all(self.root()).await?;
        Ok(())
    }

    pub fn slot_path(&self, slot: Slot) -> PathBuf {
        self.root().join(format!("{}.json", slot.key()))
    }
}

#[async_trait]
impl SlotStore for JsonFileSlots {
    async fn read_slot(&self, slot: Slot) -> Result<Option<String>, AppError> {
        let path = self.slot_path(slot);
        if !fs::try_exists(&path).await? {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path).await?;
        if raw.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(raw))
    }

    async fn write_slot(&self, slot: Slot, payload: &str) -> Result<(), AppError> {
        self.ensure_structure().await?;
        let path = self.slot_path(slot);
        // Readers must never see a half-written file.
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, payload).await?;
        fs::rename(&staging, &path).await?;
        Ok(())
    }
}
