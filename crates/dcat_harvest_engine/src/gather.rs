use std::collections::HashSet;

use dcat_harvest_core::{
    dict_value, munge_title_to_name, resolve_guid, ExtractionPipeline, Graph, NameRegistry, Node,
    Record,
};
use harvest_logging::{harvest_debug, harvest_error, harvest_info, harvest_trace, harvest_warn};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::fetch::Fetcher;
use crate::parse::parse_document;
use crate::{GatherError, HarvestObject};

/// What to do when a profile fails on one dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum ExtractionPolicy {
    /// Drop every record of the run.
    #[default]
    AbortRun,
    /// Drop only the failing record.
    SkipRecord,
}

/// Result of the gather stage: the objects to reconcile and everything that
/// went wrong on the way.
#[derive(Debug, Default)]
pub struct GatherReport {
    pub objects: Vec<HarvestObject>,
    pub errors: Vec<GatherError>,
    /// Catalog pages parsed into the graph.
    pub pages: usize,
    pub graph: Graph,
}

impl GatherReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Follows catalog pages from `root_uri`, accumulating every document into one
/// graph, then extracts a harvest object per dataset in it.
pub async fn gather(
    fetcher: &dyn Fetcher,
    pipeline: &ExtractionPipeline,
    policy: ExtractionPolicy,
    root_uri: &str,
) -> GatherReport {
    harvest_debug!("Gathering from {}", root_uri);
    let mut run = GatherRun::default();
    run.collect(fetcher, root_uri).await;
    run.build_objects(pipeline, policy);
    harvest_info!(
        "Gathered {} datasets from {} pages ({} errors)",
        run.report.objects.len(),
        run.report.pages,
        run.report.errors.len()
    );
    run.report
}

#[derive(Default)]
struct GatherRun {
    report: GatherReport,
    seen_digests: HashSet<[u8; 32]>,
    dereferenced: HashSet<String>,
}

impl GatherRun {
    fn record_error(&mut self, err: GatherError) {
        harvest_warn!("Harvester gather error: {}", err);
        self.report.errors.push(err);
    }

    async fn collect(&mut self, fetcher: &dyn Fetcher, root_uri: &str) {
        let mut next_page = Some(root_uri.to_string());
        let mut format_hint: Option<String> = None;

        while let Some(uri) = next_page.take().filter(|uri| !uri.is_empty()) {
            let output = match fetcher.fetch(&uri, 1, format_hint.as_deref()).await {
                Ok(output) => output,
                Err(source) => {
                    self.record_error(GatherError::Fetch { uri, source });
                    break;
                }
            };
            if format_hint.is_none() {
                format_hint = output.metadata.content_type.clone();
            }

            if !self.seen_digests.insert(content_digest(&output.content)) {
                harvest_warn!(
                    "Remote content was the same even when using a paginated URL, skipping ({})",
                    uri
                );
                break;
            }

            if output.content.trim().is_empty() {
                harvest_debug!("Empty content from {}, stopping", uri);
                break;
            }

            let page = match parse_document(
                &output.content,
                output.metadata.content_type.as_deref(),
                Some(&output.metadata.final_url),
            ) {
                Ok(page) => page,
                Err(source) => {
                    self.record_error(GatherError::Parse { uri, source });
                    break;
                }
            };
            self.report.pages += 1;
            let added = self.report.graph.extend(&page);
            harvest_debug!("Page {} added {} triples", uri, added);

            if !self.dereference_datasets(fetcher, &page).await {
                break;
            }

            // The run graph still holds earlier pages' links; only the page
            // just parsed knows where to go next.
            next_page = page.next_page();
        }
    }

    /// Fetches the documents of datasets the page's catalogs link to.
    /// Returns `false` when a failure must end pagination.
    async fn dereference_datasets(&mut self, fetcher: &dyn Fetcher, page: &Graph) -> bool {
        let iris: Vec<String> = page
            .datasets_in_catalogs()
            .into_iter()
            .filter_map(Node::as_iri)
            .map(str::to_string)
            .collect();

        for iri in iris {
            if !self.dereferenced.insert(iri.clone()) {
                continue;
            }
            let output = match fetcher.fetch(&iri, 1, None).await {
                Ok(output) => output,
                Err(source) => {
                    self.record_error(GatherError::Fetch { uri: iri, source });
                    return false;
                }
            };
            if output.content.trim().is_empty() {
                continue;
            }
            match parse_document(
                &output.content,
                output.metadata.content_type.as_deref(),
                Some(&output.metadata.final_url),
            ) {
                Ok(dataset_graph) => {
                    self.report.graph.extend(&dataset_graph);
                }
                Err(source) => {
                    self.record_error(GatherError::Parse { uri: iri, source });
                    return false;
                }
            }
        }
        true
    }

    fn build_objects(&mut self, pipeline: &ExtractionPipeline, policy: ExtractionPolicy) {
        let graph = std::mem::take(&mut self.report.graph);
        let mut registry = NameRegistry::new();
        let mut objects = Vec::new();

        for dataset in graph.datasets() {
            harvest_trace!("Extracting dataset {}", dataset);
            match build_object(pipeline, &graph, dataset, &mut registry) {
                Ok(object) => objects.push(object),
                Err(err @ GatherError::MissingIdentifier { .. }) => self.record_error(err),
                Err(err) => {
                    self.record_error(err);
                    if policy == ExtractionPolicy::AbortRun {
                        harvest_error!("Aborting extraction, no datasets will be harvested");
                        objects.clear();
                        break;
                    }
                }
            }
        }

        self.report.objects = objects;
        self.report.graph = graph;
    }
}

fn build_object(
    pipeline: &ExtractionPipeline,
    graph: &Graph,
    dataset: &Node,
    registry: &mut NameRegistry,
) -> Result<HarvestObject, GatherError> {
    let mut record: Record =
        pipeline
            .extract(graph, dataset)
            .map_err(|source| GatherError::Extraction {
                dataset: dataset.to_string(),
                source,
            })?;

    let name = registry.assign_name(&mut record);
    let source_url = dict_value(&record, "uri").map(str::to_string);
    let Some(guid) = resolve_guid(&record, source_url.as_deref()) else {
        let label = dict_value(&record, "title")
            .map(str::to_string)
            .unwrap_or_else(|| dataset.to_string());
        return Err(GatherError::MissingIdentifier { dataset: label });
    };

    // The store needs an alphanumeric key rather than a URI.
    let id = munge_title_to_name(&guid);
    record.insert("id".to_string(), id.clone().into());

    let content = serde_json::to_string(&record).map_err(|err| GatherError::Serialize {
        dataset: dataset.to_string(),
        message: err.to_string(),
    })?;

    Ok(HarvestObject {
        guid,
        id,
        name,
        content: Some(content),
    })
}

fn content_digest(content: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hasher.finalize().into()
}
