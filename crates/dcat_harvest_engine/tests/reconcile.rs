use std::sync::Mutex;

use dcat_harvest_core::Record;
use dcat_harvest_engine::{
    sync, HarvestObject, MemoryStore, RemoteStore, StoreError, SyncError, SyncOutcome,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

const ENTITY: &str = "dataset";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    List(String),
    Add(String, String),
    Update(String, Vec<String>),
}

/// Remembers every call; `list` returns `existing` or fails when it is `None`.
struct RecordingStore {
    existing: Option<Vec<&'static str>>,
    reject: Option<&'static str>,
    calls: Mutex<Vec<Call>>,
}

impl RecordingStore {
    fn with_existing(existing: Vec<&'static str>) -> Self {
        Self {
            existing: Some(existing),
            reject: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn unavailable() -> Self {
        Self {
            existing: None,
            reject: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn rejecting(mut self, id: &'static str) -> Self {
        self.reject = Some(id);
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn check(&self, id: &str) -> Result<(), StoreError> {
        match self.reject {
            Some(rejected) if rejected == id => {
                Err(StoreError::Rejected(format!("{id} failed validation")))
            }
            _ => Ok(()),
        }
    }
}

fn id_of(record: &Record) -> String {
    record
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[async_trait::async_trait]
impl RemoteStore for RecordingStore {
    async fn list(&self, entity: &str) -> Result<Vec<Record>, StoreError> {
        self.calls.lock().unwrap().push(Call::List(entity.to_string()));
        let existing = self
            .existing
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable("connection refused".to_string()))?;
        Ok(existing
            .iter()
            .map(|id| {
                let mut record = Record::new();
                record.insert("id".to_string(), json!(id));
                record
            })
            .collect())
    }

    async fn add(&self, entity: &str, record: Record) -> Result<(), StoreError> {
        let id = id_of(&record);
        self.calls
            .lock()
            .unwrap()
            .push(Call::Add(entity.to_string(), id.clone()));
        self.check(&id)
    }

    async fn update(&self, entity: &str, records: Vec<Record>) -> Result<(), StoreError> {
        let ids: Vec<String> = records.iter().map(id_of).collect();
        self.calls
            .lock()
            .unwrap()
            .push(Call::Update(entity.to_string(), ids.clone()));
        ids.iter().try_for_each(|id| self.check(id))
    }
}

fn object(id: &str, title: &str) -> HarvestObject {
    let content = json!({ "id": id, "name": id, "title": title }).to_string();
    HarvestObject {
        guid: id.to_string(),
        id: id.to_string(),
        name: Some(id.to_string()),
        content: Some(content),
    }
}

#[tokio::test]
async fn new_record_is_added_once() {
    harvest_logging::initialize_for_tests();
    let store = RecordingStore::with_existing(vec![]);
    let objects = vec![object("example-health-study-2023", "Example Health Study 2023!!")];

    let report = sync(&objects, &store, ENTITY).await;

    assert_eq!(
        store.calls(),
        vec![
            Call::List(ENTITY.to_string()),
            Call::Add(ENTITY.to_string(), "example-health-study-2023".to_string()),
        ]
    );
    assert_eq!(
        report.outcomes,
        vec![SyncOutcome::Created {
            id: "example-health-study-2023".to_string()
        }]
    );
}

#[tokio::test]
async fn known_record_is_updated_as_single_batch() {
    harvest_logging::initialize_for_tests();
    let store = RecordingStore::with_existing(vec!["example-health-study-2023"]);
    let objects = vec![object("example-health-study-2023", "Example Health Study 2023!!")];

    let report = sync(&objects, &store, ENTITY).await;

    assert_eq!(
        store.calls(),
        vec![
            Call::List(ENTITY.to_string()),
            Call::Update(
                ENTITY.to_string(),
                vec!["example-health-study-2023".to_string()]
            ),
        ]
    );
    assert_eq!(report.updated(), 1);
    assert_eq!(report.created(), 0);
}

#[tokio::test]
async fn list_failure_treats_everything_as_new() {
    harvest_logging::initialize_for_tests();
    let store = RecordingStore::unavailable();
    let objects = vec![object("a-dataset", "A"), object("b-dataset", "B")];

    let report = sync(&objects, &store, ENTITY).await;

    assert!(matches!(report.snapshot_error, Some(StoreError::Unavailable(_))));
    assert_eq!(report.created(), 2);
    assert_eq!(store.calls().len(), 3);
}

#[tokio::test]
async fn one_rejected_record_does_not_stop_the_batch() {
    harvest_logging::initialize_for_tests();
    let store = RecordingStore::with_existing(vec!["b-dataset"]).rejecting("b-dataset");
    let objects = vec![
        object("a-dataset", "A"),
        object("b-dataset", "B"),
        object("c-dataset", "C"),
    ];

    let report = sync(&objects, &store, ENTITY).await;

    assert_eq!(report.created(), 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(
        report.outcomes[1],
        SyncOutcome::Failed {
            name: "b-dataset".to_string(),
            error: SyncError::Store(StoreError::Rejected("b-dataset failed validation".to_string())),
        }
    );
}

#[tokio::test]
async fn empty_or_invalid_content_fails_that_record() {
    harvest_logging::initialize_for_tests();
    let store = RecordingStore::with_existing(vec![]);
    let mut empty = object("empty", "Empty");
    empty.content = None;
    let mut garbled = object("garbled", "Garbled");
    garbled.content = Some("not json".to_string());
    let objects = vec![empty, garbled, object("fine", "Fine")];

    let report = sync(&objects, &store, ENTITY).await;

    assert_eq!(report.failed(), 2);
    assert_eq!(report.created(), 1);
    assert!(matches!(
        &report.outcomes[0],
        SyncOutcome::Failed { error: SyncError::EmptyContent, .. }
    ));
    assert!(matches!(
        &report.outcomes[1],
        SyncOutcome::Failed { error: SyncError::InvalidContent(_), .. }
    ));
}

#[tokio::test]
async fn memory_store_round_trip() {
    harvest_logging::initialize_for_tests();
    let mut seeded = Record::new();
    seeded.insert("id".to_string(), json!("a-dataset"));
    seeded.insert("title".to_string(), json!("Old title"));
    let store = MemoryStore::with_records(ENTITY, vec![seeded]);
    let objects = vec![object("a-dataset", "New title"), object("b-dataset", "B")];

    let report = sync(&objects, &store, ENTITY).await;

    assert_eq!(report.updated(), 1);
    assert_eq!(report.created(), 1);
    assert_eq!(store.len(ENTITY).await, 2);
    let updated = store.get(ENTITY, "a-dataset").await.unwrap();
    assert_eq!(updated["title"], json!("New title"));
}
