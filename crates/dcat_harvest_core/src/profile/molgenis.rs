use serde_json::Value;

use super::{Profile, ProfileError, ProfileReader};
use crate::graph::{Graph, Node};
use crate::record::Record;
use crate::vocab::dct;

/// Profile for MOLGENIS collection entities.
///
/// Collections are keyed by the dataset IRI and named after the dataset
/// title. Attributes the catalog does not describe but the target entity
/// requires are filled from `defaults`.
#[derive(Debug, Clone, Default)]
pub struct MolgenisCollectionProfile {
    defaults: Record,
}

impl MolgenisCollectionProfile {
    pub fn new(defaults: Record) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &Record {
        &self.defaults
    }
}

impl Profile for MolgenisCollectionProfile {
    fn name(&self) -> &'static str {
        "molgenis_collection"
    }

    fn parse_dataset(
        &self,
        record: &mut Record,
        dataset: &Node,
        graph: &Graph,
    ) -> Result<(), ProfileError> {
        let reader = ProfileReader::new(graph);

        if let Some(iri) = dataset.as_iri() {
            record.insert("uri".to_string(), iri.into());
        }

        for (key, predicate) in [("name", dct::TITLE), ("description", dct::DESCRIPTION)] {
            if let Some(value) = reader.object_value(dataset, predicate) {
                record.insert(key.to_string(), Value::from(value));
            }
        }

        for (key, value) in &self.defaults {
            record.insert(key.clone(), value.clone());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Triple;
    use crate::vocab::{dcat, rdf};
    use serde_json::json;

    #[test]
    fn writes_uri_title_and_defaults() {
        let mut graph = Graph::new();
        let ds = Node::iri("https://fdp.example.org/dataset/1");
        graph.insert(Triple::new(ds.clone(), rdf::TYPE, Node::iri(dcat::DATASET)));
        graph.insert(Triple::new(ds.clone(), dct::TITLE, Node::literal("Lung scans")));

        let mut defaults = Record::new();
        defaults.insert("country".to_string(), json!("EU"));
        defaults.insert("order_of_magnitude".to_string(), json!(1));
        let profile = MolgenisCollectionProfile::new(defaults);

        let mut record = Record::new();
        profile.parse_dataset(&mut record, &ds, &graph).unwrap();

        assert_eq!(record["uri"], json!("https://fdp.example.org/dataset/1"));
        assert_eq!(record["name"], json!("Lung scans"));
        assert_eq!(record["country"], json!("EU"));
        assert_eq!(record["order_of_magnitude"], json!(1));
        assert!(!record.contains_key("description"));
    }
}
