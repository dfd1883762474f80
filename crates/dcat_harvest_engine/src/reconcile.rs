use std::collections::{BTreeMap, HashSet};

use dcat_harvest_core::Record;
use harvest_logging::{harvest_debug, harvest_error, harvest_info};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::HarvestObject;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("remote store unavailable: {0}")]
    Unavailable(String),
    #[error("remote store rejected the record: {0}")]
    Rejected(String),
}

/// Why a single object could not be written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("empty content")]
    EmptyContent,
    #[error("content is not a JSON record: {0}")]
    InvalidContent(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The catalog side of a harvest. Authentication and sessions are the
/// implementor's business.
#[async_trait::async_trait]
pub trait RemoteStore: Send + Sync {
    async fn list(&self, entity: &str) -> Result<Vec<Record>, StoreError>;
    async fn add(&self, entity: &str, record: Record) -> Result<(), StoreError>;
    async fn update(&self, entity: &str, records: Vec<Record>) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Created { id: String },
    Updated { id: String },
    Failed { name: String, error: SyncError },
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub outcomes: Vec<SyncOutcome>,
    /// Set when the existing ids could not be listed and every object was
    /// treated as new.
    pub snapshot_error: Option<StoreError>,
}

impl SyncReport {
    pub fn created(&self) -> usize {
        self.count(|outcome| matches!(outcome, SyncOutcome::Created { .. }))
    }

    pub fn updated(&self) -> usize {
        self.count(|outcome| matches!(outcome, SyncOutcome::Updated { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, SyncOutcome::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&SyncOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|outcome| predicate(outcome)).count()
    }
}

/// Creates or updates every object in `entity`, one independent call per
/// object. Failures are reported per object and never stop the batch.
pub async fn sync(objects: &[HarvestObject], store: &dyn RemoteStore, entity: &str) -> SyncReport {
    let mut report = SyncReport::default();

    let existing = match store.list(entity).await {
        Ok(records) => existing_ids(&records),
        Err(err) => {
            harvest_error!("Could not list existing {} records, treating all as new: {}", entity, err);
            report.snapshot_error = Some(err);
            HashSet::new()
        }
    };
    harvest_debug!("{} existing {} records", existing.len(), entity);

    for object in objects {
        let outcome = match sync_object(object, store, entity, &existing).await {
            Ok(outcome) => outcome,
            Err(error) => {
                let name = object.name.clone().unwrap_or_else(|| object.guid.clone());
                harvest_error!("Error when creating or updating {}: {}", name, error);
                SyncOutcome::Failed { name, error }
            }
        };
        report.outcomes.push(outcome);
    }

    harvest_info!(
        "Sync of {} finished: {} created, {} updated, {} failed",
        entity,
        report.created(),
        report.updated(),
        report.failed()
    );
    report
}

async fn sync_object(
    object: &HarvestObject,
    store: &dyn RemoteStore,
    entity: &str,
    existing: &HashSet<String>,
) -> Result<SyncOutcome, SyncError> {
    let content = object
        .content
        .as_deref()
        .filter(|content| !content.trim().is_empty())
        .ok_or(SyncError::EmptyContent)?;
    let record: Record =
        serde_json::from_str(content).map_err(|err| SyncError::InvalidContent(err.to_string()))?;

    let id = object.id.clone();
    if existing.contains(&id) {
        harvest_info!("Updating record {}", id);
        store.update(entity, vec![record]).await?;
        Ok(SyncOutcome::Updated { id })
    } else {
        harvest_info!("Creating record {}", id);
        store.add(entity, record).await?;
        Ok(SyncOutcome::Created { id })
    }
}

fn existing_ids(records: &[Record]) -> HashSet<String> {
    records
        .iter()
        .filter_map(|record| record.get("id").and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}

fn record_id(record: &Record) -> Result<String, StoreError> {
    record
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| StoreError::Rejected("record has no id".to_string()))
}

/// Keeps entities in memory, keyed by record id. Useful for dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entities: Mutex<BTreeMap<String, BTreeMap<String, Record>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `entity` with `records`; records without an id are ignored.
    pub fn with_records(entity: &str, records: impl IntoIterator<Item = Record>) -> Self {
        let mut rows = BTreeMap::new();
        for record in records {
            if let Ok(id) = record_id(&record) {
                rows.insert(id, record);
            }
        }
        let mut entities = BTreeMap::new();
        entities.insert(entity.to_string(), rows);
        Self {
            entities: Mutex::new(entities),
        }
    }

    pub async fn get(&self, entity: &str, id: &str) -> Option<Record> {
        let entities = self.entities.lock().await;
        entities.get(entity)?.get(id).cloned()
    }

    pub async fn len(&self, entity: &str) -> usize {
        let entities = self.entities.lock().await;
        entities.get(entity).map_or(0, BTreeMap::len)
    }
}

#[async_trait::async_trait]
impl RemoteStore for MemoryStore {
    async fn list(&self, entity: &str) -> Result<Vec<Record>, StoreError> {
        let entities = self.entities.lock().await;
        Ok(entities
            .get(entity)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn add(&self, entity: &str, record: Record) -> Result<(), StoreError> {
        let id = record_id(&record)?;
        let mut entities = self.entities.lock().await;
        let rows = entities.entry(entity.to_string()).or_default();
        if rows.contains_key(&id) {
            return Err(StoreError::Rejected(format!("{id} already exists")));
        }
        rows.insert(id, record);
        Ok(())
    }

    async fn update(&self, entity: &str, records: Vec<Record>) -> Result<(), StoreError> {
        let mut entities = self.entities.lock().await;
        let rows = entities.entry(entity.to_string()).or_default();
        for record in records {
            let id = record_id(&record)?;
            if !rows.contains_key(&id) {
                return Err(StoreError::Rejected(format!("{id} does not exist")));
            }
            rows.insert(id, record);
        }
        Ok(())
    }
}
