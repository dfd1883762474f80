//! Extraction profiles: units that read a dataset from the graph into a record.
mod dcat_ap;
mod molgenis;

pub use dcat_ap::DcatApProfile;
pub use molgenis::MolgenisCollectionProfile;

use serde_json::Value;

use crate::graph::{Graph, Literal, Node};
use crate::record::Record;
use crate::vocab::{dcat, dct, foaf, locn, rdf, rdfs, schema, skos, vcard, GEOJSON_MEDIA_TYPE};

/// Language preferred when a property carries several tagged literals.
const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("{profile}: invalid value {value:?} for <{predicate}> on {subject}: expected {expected}")]
    InvalidValue {
        profile: &'static str,
        subject: String,
        predicate: String,
        value: String,
        expected: &'static str,
    },
}

/// Maps graph data about one dataset into record fields.
///
/// Profiles run in a caller-chosen order over the same record; later profiles
/// see, and may overwrite, what earlier ones wrote. A profile must not hold on
/// to the graph beyond the call.
pub trait Profile: Send + Sync {
    fn name(&self) -> &'static str;

    fn parse_dataset(
        &self,
        record: &mut Record,
        dataset: &Node,
        graph: &Graph,
    ) -> Result<(), ProfileError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contact {
    pub uri: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Publisher {
    pub uri: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub url: Option<String>,
    pub kind: Option<String>,
}

/// Where a dataset applies: a location IRI, a label and a GeoJSON geometry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Spatial {
    pub uri: Option<String>,
    pub text: Option<String>,
    pub geom: Option<String>,
}

/// Read helpers shared by profiles.
#[derive(Debug, Clone, Copy)]
pub struct ProfileReader<'g> {
    graph: &'g Graph,
}

impl<'g> ProfileReader<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Value of `predicate` on `subject`.
    ///
    /// An IRI or a literal in the default language is returned as soon as it
    /// is seen; otherwise the first literal found is used.
    pub fn object_value(&self, subject: &Node, predicate: &str) -> Option<String> {
        let mut fallback: Option<&str> = None;
        for object in self.graph.objects(subject, predicate) {
            match object {
                Node::Literal(literal) => {
                    if literal.language.as_deref() == Some(DEFAULT_LANGUAGE) {
                        return non_empty(&literal.value);
                    }
                    if fallback.is_none() {
                        fallback = Some(&literal.value);
                    }
                }
                other => return non_empty(other.as_str()),
            }
        }
        fallback.and_then(non_empty)
    }

    /// All distinct values of `predicate` on `subject`, in graph order.
    pub fn object_values(&self, subject: &Node, predicate: &str) -> Vec<String> {
        let mut values: Vec<String> = Vec::new();
        for object in self.graph.objects(subject, predicate) {
            let value = object.as_str();
            if !value.is_empty() && !values.iter().any(|v| v == value) {
                values.push(value.to_string());
            }
        }
        values
    }

    /// Integer value of `predicate`.
    ///
    /// `Ok(None)` when absent, an error when present but not a whole number.
    pub fn object_int(
        &self,
        profile: &'static str,
        subject: &Node,
        predicate: &str,
    ) -> Result<Option<i64>, ProfileError> {
        let Some(object) = self.graph.value(subject, predicate) else {
            return Ok(None);
        };
        object.as_integer().map(Some).ok_or_else(|| ProfileError::InvalidValue {
            profile,
            subject: subject.to_string(),
            predicate: predicate.to_string(),
            value: object.as_str().to_string(),
            expected: "an integer",
        })
    }

    pub fn keywords(&self, dataset: &Node) -> Vec<String> {
        self.object_values(dataset, dcat::KEYWORD)
    }

    pub fn distributions(&self, dataset: &Node) -> Vec<&'g Node> {
        self.graph.objects(dataset, dcat::DISTRIBUTION).collect()
    }

    /// First contact point (vCard) under `predicate`.
    pub fn contact_details(&self, subject: &Node, predicate: &str) -> Option<Contact> {
        let agent = self.graph.value(subject, predicate)?;
        Some(Contact {
            uri: agent.as_iri().map(str::to_string),
            name: self.object_value(agent, vcard::FN),
            email: self
                .object_value(agent, vcard::HAS_EMAIL)
                .map(|email| without_mailto(&email)),
        })
    }

    pub fn publisher(&self, subject: &Node, predicate: &str) -> Publisher {
        let Some(agent) = self.graph.value(subject, predicate) else {
            return Publisher::default();
        };
        Publisher {
            uri: agent.as_iri().map(str::to_string),
            name: self.object_value(agent, foaf::NAME),
            email: self
                .object_value(agent, foaf::MBOX)
                .map(|email| without_mailto(&email)),
            url: self.object_value(agent, foaf::HOMEPAGE),
            kind: self.object_value(agent, dct::TYPE),
        }
    }

    /// Start and end of the first temporal interval under `predicate`.
    pub fn time_interval(
        &self,
        subject: &Node,
        predicate: &str,
    ) -> (Option<String>, Option<String>) {
        for interval in self.graph.objects(subject, predicate) {
            let start = self
                .object_value(interval, schema::START_DATE)
                .or_else(|| self.object_value(interval, dcat::START_DATE));
            let end = self
                .object_value(interval, schema::END_DATE)
                .or_else(|| self.object_value(interval, dcat::END_DATE));
            if start.is_some() || end.is_some() {
                return (start, end);
            }
        }
        (None, None)
    }

    /// Spatial coverage under `predicate`.
    ///
    /// Later values overwrite earlier ones. Geometry and labels are only read
    /// from nodes typed `dct:Location`; geometries that are not GeoJSON are
    /// ignored.
    pub fn spatial(&self, subject: &Node, predicate: &str) -> Spatial {
        let mut spatial = Spatial::default();
        for location in self.graph.objects(subject, predicate) {
            match location {
                Node::Iri(iri) => spatial.uri = Some(iri.clone()),
                Node::Literal(literal) => spatial.text = Some(literal.value.clone()),
                Node::Blank(_) => {}
            }

            let is_location = self
                .graph
                .objects(location, rdf::TYPE)
                .any(|class| class.as_iri() == Some(dct::LOCATION));
            if !is_location {
                continue;
            }

            for geometry in self.graph.objects(location, locn::GEOMETRY) {
                if let Some(literal) = geometry.as_literal().filter(|l| is_geojson(l)) {
                    spatial.geom = Some(literal.value.clone());
                }
            }
            let labels = self
                .graph
                .objects(location, skos::PREF_LABEL)
                .chain(self.graph.objects(location, rdfs::LABEL));
            for label in labels {
                spatial.text = Some(label.as_str().to_string());
            }
        }
        spatial
    }

    /// Rights statement: the value itself, or the label of an inline
    /// (blank node) statement.
    pub fn access_rights(&self, subject: &Node, predicate: &str) -> Option<String> {
        let object = self.graph.value(subject, predicate)?;
        if object.is_blank() {
            self.object_value(object, rdfs::LABEL)
        } else {
            non_empty(object.as_str())
        }
    }

    /// Dataset license, taken from its distributions when they all agree.
    pub fn license(&self, dataset: &Node) -> Option<String> {
        let mut licenses = self
            .distributions(dataset)
            .into_iter()
            .filter_map(|distribution| self.object_value(distribution, dct::LICENSE));
        let first = licenses.next()?;
        licenses.all(|other| other == first).then_some(first)
    }

    /// `(media type, format label)` of a distribution.
    pub fn distribution_format(&self, distribution: &Node) -> (Option<String>, Option<String>) {
        let media_type = self.object_value(distribution, dcat::MEDIA_TYPE);
        let label = self.object_value(distribution, dct::FORMAT);
        (media_type, label)
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn is_geojson(literal: &Literal) -> bool {
    let typed_ok = match literal.datatype.as_deref() {
        None => true,
        Some(datatype) => datatype == GEOJSON_MEDIA_TYPE,
    };
    typed_ok && serde_json::from_str::<Value>(&literal.value).is_ok()
}

fn without_mailto(email: &str) -> String {
    email.strip_prefix("mailto:").unwrap_or(email).to_string()
}
