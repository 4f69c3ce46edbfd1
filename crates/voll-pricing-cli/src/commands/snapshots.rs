use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use voll_pricing_core::pricing::{calculate_pricing, CalculatedResults};
use voll_pricing_core::snapshots::{PricingSnapshot, SnapshotStore};
use voll_pricing_core::{PricingError, PricingResult};

use crate::input;
use crate::settings::Settings;
use crate::store::JsonFileSnapshotStore;

/// Saved calculations
#[derive(Subcommand)]
pub enum SnapshotCommand {
    /// Save pricing inputs under a name
    Save(SaveArgs),
    /// List saved calculations, newest first
    List(OwnerArgs),
    /// Show a saved calculation with freshly computed results
    Show(IdArgs),
    /// Delete a saved calculation
    Delete(IdArgs),
}

#[derive(Args)]
pub struct SaveArgs {
    /// Path to JSON or YAML pricing inputs (stdin if omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Name to save the calculation under
    #[arg(long)]
    pub name: String,

    #[command(flatten)]
    pub owner: OwnerArgs,
}

#[derive(Args)]
pub struct OwnerArgs {
    /// Owner id (defaults to the configured owner_id)
    #[arg(long)]
    pub owner: Option<String>,
}

#[derive(Args)]
pub struct IdArgs {
    /// Snapshot id
    #[arg(long)]
    pub id: Uuid,

    #[command(flatten)]
    pub owner: OwnerArgs,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotSummary {
    id: Uuid,
    name: String,
    created_at: String,
}

#[derive(Debug, Serialize)]
struct SnapshotList {
    results: Vec<SnapshotSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotDetail {
    snapshot: PricingSnapshot,
    calculation: CalculatedResults,
}

impl OwnerArgs {
    fn resolve<'a>(&'a self, settings: &'a Settings) -> &'a str {
        self.owner.as_deref().unwrap_or(&settings.owner_id)
    }
}

pub fn run_snapshot(
    command: SnapshotCommand,
    settings: &Settings,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut store = JsonFileSnapshotStore::open(&settings.snapshot_path)?;

    match command {
        SnapshotCommand::Save(args) => {
            let inputs = input::load_inputs(args.input.as_deref())?;
            let snapshot = store.create(args.owner.resolve(settings), &args.name, &inputs)?;
            Ok(serde_json::to_value(summary(&snapshot))?)
        }
        SnapshotCommand::List(args) => {
            let results = store
                .list(args.resolve(settings))?
                .iter()
                .map(summary)
                .collect();
            Ok(serde_json::to_value(SnapshotList { results })?)
        }
        SnapshotCommand::Show(args) => {
            let snapshot = owned_snapshot(&store, args.owner.resolve(settings), args.id)?;
            let calculation = calculate_pricing(&snapshot.inputs.sanitized());
            Ok(serde_json::to_value(SnapshotDetail {
                snapshot,
                calculation,
            })?)
        }
        SnapshotCommand::Delete(args) => {
            store.delete(args.owner.resolve(settings), args.id)?;
            Ok(serde_json::json!({ "deleted": args.id }))
        }
    }
}

/// Fetch a snapshot, refusing ones saved by another owner.
fn owned_snapshot(
    store: &impl SnapshotStore,
    owner_id: &str,
    id: Uuid,
) -> PricingResult<PricingSnapshot> {
    let snapshot = store.get(id)?;
    if snapshot.owner_id != owner_id {
        return Err(PricingError::Unauthorized {
            owner_id: owner_id.to_string(),
            snapshot_id: id.to_string(),
        });
    }
    Ok(snapshot)
}

fn summary(snapshot: &PricingSnapshot) -> SnapshotSummary {
    SnapshotSummary {
        id: snapshot.id,
        name: snapshot.name.clone(),
        created_at: snapshot.created_at.to_rfc3339(),
    }
}
