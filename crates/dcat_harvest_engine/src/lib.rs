//! Harvest engine: fetching, parsing, pagination and remote reconciliation.
mod config;
mod fetch;
mod gather;
mod harvester;
mod parse;
mod reconcile;
mod types;

pub use config::{ConfigError, FetchOverrides, HarvestConfig, ProfileConfig};
pub use fetch::{
    guess_format, paged_url, FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_MAX_FILE_SIZE_MB,
};
pub use gather::{gather, ExtractionPolicy, GatherReport};
pub use harvester::{HarvestSettings, HarvestSummary, Harvester};
pub use parse::{parse_document, DocumentFormat, ParseError};
pub use reconcile::{
    sync, MemoryStore, RemoteStore, StoreError, SyncError, SyncOutcome, SyncReport,
};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput, GatherError, HarvestObject};
