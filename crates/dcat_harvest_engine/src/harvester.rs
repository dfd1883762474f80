use dcat_harvest_core::{ExtractionPipeline, Profile};
use harvest_logging::harvest_info;

use crate::config::HarvestConfig;
use crate::fetch::{Fetcher, ReqwestFetcher};
use crate::gather::{gather, ExtractionPolicy, GatherReport};
use crate::reconcile::{sync, RemoteStore, SyncReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestSettings {
    pub catalog_uri: String,
    /// Remote entity the records are written to.
    pub entity: String,
    pub extraction_policy: ExtractionPolicy,
}

#[derive(Debug)]
pub struct HarvestSummary {
    pub gather: GatherReport,
    pub sync: SyncReport,
}

/// One harvest source: where to read, how to extract, where to write.
///
/// Every run starts from an empty graph and name registry.
pub struct Harvester {
    fetcher: Box<dyn Fetcher>,
    pipeline: ExtractionPipeline,
    settings: HarvestSettings,
}

impl Harvester {
    pub fn new(
        fetcher: Box<dyn Fetcher>,
        profiles: Vec<Box<dyn Profile>>,
        settings: HarvestSettings,
    ) -> Self {
        Self {
            fetcher,
            pipeline: ExtractionPipeline::new(profiles),
            settings,
        }
    }

    pub fn from_config(config: &HarvestConfig) -> Self {
        let fetcher = ReqwestFetcher::new(config.fetch_settings());
        let settings = HarvestSettings {
            catalog_uri: config.catalog_uri.clone(),
            entity: config.entity.clone(),
            extraction_policy: config.extraction_policy,
        };
        Self::new(Box::new(fetcher), config.build_profiles(), settings)
    }

    pub fn settings(&self) -> &HarvestSettings {
        &self.settings
    }

    pub fn pipeline(&self) -> &ExtractionPipeline {
        &self.pipeline
    }

    pub async fn gather(&self, root_uri: &str) -> GatherReport {
        gather(
            self.fetcher.as_ref(),
            &self.pipeline,
            self.settings.extraction_policy,
            root_uri,
        )
        .await
    }

    /// Gathers from the configured catalog and writes the result to `store`.
    pub async fn run(&self, store: &dyn RemoteStore) -> HarvestSummary {
        harvest_info!(
            "Harvesting {} into {} with profiles {:?}",
            self.settings.catalog_uri,
            self.settings.entity,
            self.pipeline
        );
        let gather = self.gather(&self.settings.catalog_uri).await;
        let sync = sync(&gather.objects, store, &self.settings.entity).await;
        HarvestSummary { gather, sync }
    }

    /// [`Harvester::run`] for callers without a runtime of their own.
    pub fn run_blocking(&self, store: &dyn RemoteStore) -> std::io::Result<HarvestSummary> {
        let runtime = tokio::runtime::Runtime::new()?;
        Ok(runtime.block_on(self.run(store)))
    }
}
