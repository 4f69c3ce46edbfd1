//! Named, owner-scoped snapshots of pricing inputs.
//!
//! Only inputs are stored. Results are recomputed whenever a snapshot is
//! loaded, so a snapshot can never disagree with the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::PricingError;
use crate::pricing::PricingInputs;
use crate::PricingResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingSnapshot {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub inputs: PricingInputs,
}

/// Persistence boundary for saved calculations.
pub trait SnapshotStore {
    /// Save `inputs` under `name` for `owner_id`.
    fn create(
        &mut self,
        owner_id: &str,
        name: &str,
        inputs: &PricingInputs,
    ) -> PricingResult<PricingSnapshot>;

    /// Snapshots of one owner, newest first.
    fn list(&self, owner_id: &str) -> PricingResult<Vec<PricingSnapshot>>;

    fn get(&self, id: Uuid) -> PricingResult<PricingSnapshot>;

    /// Delete a snapshot. Only its owner may delete it.
    fn delete(&mut self, owner_id: &str, id: Uuid) -> PricingResult<()>;
}

/// Build a new snapshot, validating the owner and name.
pub fn new_snapshot(
    owner_id: &str,
    name: &str,
    inputs: &PricingInputs,
) -> PricingResult<PricingSnapshot> {
    if owner_id.trim().is_empty() {
        return Err(PricingError::InvalidInput {
            field: "ownerId".into(),
            reason: "Owner id is required to save a calculation.".into(),
        });
    }
    let name = name.trim();
    if name.is_empty() {
        return Err(PricingError::InvalidInput {
            field: "name".into(),
            reason: "A calculation needs a name to be saved.".into(),
        });
    }
    Ok(PricingSnapshot {
        id: Uuid::new_v4(),
        owner_id: owner_id.to_string(),
        name: name.to_string(),
        created_at: Utc::now(),
        inputs: inputs.clone(),
    })
}

#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotStore {
    snapshots: HashMap<Uuid, PricingSnapshot>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from previously saved snapshots.
    pub fn from_snapshots(snapshots: impl IntoIterator<Item = PricingSnapshot>) -> Self {
        Self {
            snapshots: snapshots.into_iter().map(|s| (s.id, s)).collect(),
        }
    }

    /// All snapshots, oldest first.
    pub fn snapshots(&self) -> Vec<PricingSnapshot> {
        let mut all: Vec<PricingSnapshot> = self.snapshots.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        all
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn create(
        &mut self,
        owner_id: &str,
        name: &str,
        inputs: &PricingInputs,
    ) -> PricingResult<PricingSnapshot> {
        let snapshot = new_snapshot(owner_id, name, inputs)?;
        tracing::info!(id = %snapshot.id, owner = owner_id, name = %snapshot.name, "snapshot saved");
        self.snapshots.insert(snapshot.id, snapshot.clone());
        Ok(snapshot)
    }

    fn list(&self, owner_id: &str) -> PricingResult<Vec<PricingSnapshot>> {
        let mut owned: Vec<PricingSnapshot> = self
            .snapshots
            .values()
            .filter(|s| s.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(owned)
    }

    fn get(&self, id: Uuid) -> PricingResult<PricingSnapshot> {
        self.snapshots
            .get(&id)
            .cloned()
            .ok_or_else(|| PricingError::SnapshotNotFound(id.to_string()))
    }

    fn delete(&mut self, owner_id: &str, id: Uuid) -> PricingResult<()> {
        let snapshot = self
            .snapshots
            .get(&id)
            .ok_or_else(|| PricingError::SnapshotNotFound(id.to_string()))?;
        if snapshot.owner_id != owner_id {
            return Err(PricingError::Unauthorized {
                owner_id: owner_id.to_string(),
                snapshot_id: id.to_string(),
            });
        }
        self.snapshots.remove(&id);
        tracing::info!(%id, owner = owner_id, "snapshot deleted");
        Ok(())
    }
}
