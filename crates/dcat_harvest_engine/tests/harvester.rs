use std::path::Path;

use dcat_harvest_core::{DcatApProfile, Profile, Record};
use dcat_harvest_engine::{
    ExtractionPolicy, FetchSettings, HarvestConfig, HarvestSettings, Harvester, MemoryStore,
    ReqwestFetcher, SyncOutcome,
};
use pretty_assertions::assert_eq;
use serde_json::json;

const CATALOG: &str = r#"
@prefix dcat: <http://www.w3.org/ns/dcat#> .
@prefix dct: <http://purl.org/dc/terms/> .

_:study a dcat:Dataset ;
    dct:title "Example Health Study 2023!!" ;
    dct:description "Synthetic cohort." .
"#;

const ENTITY: &str = "dataset";

fn write_catalog(dir: &Path) -> String {
    let path = dir.join("catalog.ttl");
    std::fs::write(&path, CATALOG).expect("write catalog");
    path.to_string_lossy().to_string()
}

fn harvester(catalog_uri: String) -> Harvester {
    let profiles: Vec<Box<dyn Profile>> = vec![Box::new(DcatApProfile)];
    Harvester::new(
        Box::new(ReqwestFetcher::new(FetchSettings::default())),
        profiles,
        HarvestSettings {
            catalog_uri,
            entity: ENTITY.to_string(),
            extraction_policy: ExtractionPolicy::AbortRun,
        },
    )
}

#[tokio::test]
async fn new_dataset_is_created_under_its_slug() {
    harvest_logging::initialize_for_tests();
    let dir = tempfile::tempdir().expect("temp dir");
    let harvester = harvester(write_catalog(dir.path()));
    let store = MemoryStore::new();

    let summary = harvester.run(&store).await;

    assert!(summary.gather.is_clean(), "{:?}", summary.gather.errors);
    assert_eq!(
        summary.sync.outcomes,
        vec![SyncOutcome::Created {
            id: "example-health-study-2023".to_string()
        }]
    );
    let stored = store
        .get(ENTITY, "example-health-study-2023")
        .await
        .expect("stored record");
    assert_eq!(stored["title"], json!("Example Health Study 2023!!"));
    assert_eq!(stored["notes"], json!("Synthetic cohort."));
}

#[tokio::test]
async fn existing_dataset_is_updated() {
    harvest_logging::initialize_for_tests();
    let dir = tempfile::tempdir().expect("temp dir");
    let harvester = harvester(write_catalog(dir.path()));
    let mut existing = Record::new();
    existing.insert("id".to_string(), json!("example-health-study-2023"));
    let store = MemoryStore::with_records(ENTITY, vec![existing]);

    let summary = harvester.run(&store).await;

    assert_eq!(summary.sync.updated(), 1);
    assert_eq!(summary.sync.created(), 0);
    assert_eq!(store.len(ENTITY).await, 1);
}

#[test]
fn configured_harvest_runs_blocking() {
    harvest_logging::initialize_for_tests();
    let dir = tempfile::tempdir().expect("temp dir");
    let catalog = write_catalog(dir.path());
    let config_path = dir.path().join("harvest.ron");
    std::fs::write(
        &config_path,
        format!(
            r#"(
                catalog_uri: "{catalog}",
                entity: "collections",
                profiles: [
                    DcatAp,
                    MolgenisCollection(defaults: {{"type": "other", "country": "NL"}}),
                ],
                fetch: (max_file_size_mb: Some(1)),
                extraction_policy: SkipRecord,
            )"#
        ),
    )
    .expect("write config");

    let config = HarvestConfig::load(&config_path).expect("config");
    assert_eq!(config.fetch_settings().max_bytes, 1024 * 1024);
    let harvester = Harvester::from_config(&config);
    assert_eq!(harvester.settings().extraction_policy, ExtractionPolicy::SkipRecord);
    assert_eq!(harvester.pipeline().profiles().len(), 2);

    let store = MemoryStore::new();
    let summary = harvester.run_blocking(&store).expect("runtime");

    assert_eq!(summary.sync.created(), 1);
    let stored = stored_collection(&store);
    assert_eq!(stored["type"], json!("other"));
    assert_eq!(stored["country"], json!("NL"));
}

fn stored_collection(store: &MemoryStore) -> Record {
    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    runtime
        .block_on(store.get("collections", "example-health-study-2023"))
        .expect("stored record")
}
