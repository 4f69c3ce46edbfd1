//! Snapshot store persisted as a JSON array on disk.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;
use voll_pricing_core::pricing::PricingInputs;
use voll_pricing_core::snapshots::{InMemorySnapshotStore, PricingSnapshot, SnapshotStore};
use voll_pricing_core::{PricingError, PricingResult};

pub struct JsonFileSnapshotStore {
    path: PathBuf,
    inner: InMemorySnapshotStore,
}

impl JsonFileSnapshotStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> PricingResult<Self> {
        let path = path.as_ref().to_path_buf();
        let inner = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|e| {
                PricingError::Storage(format!("Failed to read '{}': {}", path.display(), e))
            })?;
            let snapshots: Vec<PricingSnapshot> = if contents.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&contents)?
            };
            InMemorySnapshotStore::from_snapshots(snapshots)
        } else {
            InMemorySnapshotStore::new()
        };
        tracing::debug!(path = %path.display(), count = inner.len(), "snapshot store opened");
        Ok(Self { path, inner })
    }

    fn persist(&self) -> PricingResult<()> {
        let json = serde_json::to_string_pretty(&self.inner.snapshots())?;
        fs::write(&self.path, json).map_err(|e| {
            PricingError::Storage(format!("Failed to write '{}': {}", self.path.display(), e))
        })
    }
}

impl SnapshotStore for JsonFileSnapshotStore {
    fn create(
        &mut self,
        owner_id: &str,
        name: &str,
        inputs: &PricingInputs,
    ) -> PricingResult<PricingSnapshot> {
        let snapshot = self.inner.create(owner_id, name, inputs)?;
        self.persist()?;
        Ok(snapshot)
    }

    fn list(&self, owner_id: &str) -> PricingResult<Vec<PricingSnapshot>> {
        self.inner.list(owner_id)
    }

    fn get(&self, id: Uuid) -> PricingResult<PricingSnapshot> {
        self.inner.get(id)
    }

    fn delete(&mut self, owner_id: &str, id: Uuid) -> PricingResult<()> {
        self.inner.delete(owner_id, id)?;
        self.persist()
    }
}
