use std::fmt;

use crate::graph::{Graph, Node};
use crate::profile::{Profile, ProfileError};
use crate::record::Record;

/// Every subject typed `dcat:Dataset` in the graph, in first-seen order.
pub fn dataset_refs(graph: &Graph) -> Vec<&Node> {
    graph.datasets().collect()
}

/// Builds the record for one dataset by running `profiles` in order over a
/// single, initially empty record. The result is not validated.
pub fn extract(
    graph: &Graph,
    dataset: &Node,
    profiles: &[Box<dyn Profile>],
) -> Result<Record, ProfileError> {
    let mut record = Record::new();
    for profile in profiles {
        profile.parse_dataset(&mut record, dataset, graph)?;
    }
    Ok(record)
}

/// An ordered, caller-configured list of profiles.
#[derive(Default)]
pub struct ExtractionPipeline {
    profiles: Vec<Box<dyn Profile>>,
}

impl ExtractionPipeline {
    pub fn new(profiles: Vec<Box<dyn Profile>>) -> Self {
        Self { profiles }
    }

    /// Appends a profile; it runs after all profiles added before it.
    pub fn with_profile(mut self, profile: impl Profile + 'static) -> Self {
        self.profiles.push(Box::new(profile));
        self
    }

    pub fn profiles(&self) -> &[Box<dyn Profile>] {
        &self.profiles
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn extract(&self, graph: &Graph, dataset: &Node) -> Result<Record, ProfileError> {
        extract(graph, dataset, &self.profiles)
    }
}

impl fmt::Debug for ExtractionPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.profiles.iter().map(|p| p.name()))
            .finish()
    }
}
