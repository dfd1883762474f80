use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::vocab::{dcat, hydra, rdf, xsd};

/// An RDF term as stored in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    Iri(String),
    Blank(String),
    Literal(Literal),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    pub value: String,
    /// Datatype IRI; `None` means a plain string.
    pub datatype: Option<String>,
    pub language: Option<String>,
}

impl Literal {
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        let datatype = datatype.into();
        Self {
            value: value.into(),
            // xsd:string and plain literals are the same thing for our lookups.
            datatype: (datatype != xsd::STRING).then_some(datatype),
            language: None,
        }
    }

    pub fn tagged(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: Some(language.into()),
        }
    }
}

impl Node {
    pub fn iri(value: impl Into<String>) -> Self {
        Node::Iri(value.into())
    }

    pub fn blank(id: impl Into<String>) -> Self {
        Node::Blank(id.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Node::Literal(Literal::string(value))
    }

    /// Lexical form: the IRI, the blank node id or the literal value.
    pub fn as_str(&self) -> &str {
        match self {
            Node::Iri(iri) => iri,
            Node::Blank(id) => id,
            Node::Literal(literal) => &literal.value,
        }
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Node::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Node::Blank(_))
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Node::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    /// Integer value of a literal, accepting any numeric lexical form that
    /// has no fractional part.
    pub fn as_integer(&self) -> Option<i64> {
        let literal = self.as_literal()?;
        let value = literal.value.trim();
        if let Ok(parsed) = value.parse::<i64>() {
            return Some(parsed);
        }
        match literal.datatype.as_deref() {
            Some(xsd::DECIMAL) | None => value
                .parse::<f64>()
                .ok()
                .filter(|v| v.fract() == 0.0 && v.is_finite())
                .map(|v| v as i64),
            _ => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Iri(iri) => write!(f, "<{iri}>"),
            Node::Blank(id) => write!(f, "_:{id}"),
            Node::Literal(literal) => match (&literal.language, &literal.datatype) {
                (Some(lang), _) => write!(f, "{:?}@{lang}", literal.value),
                (None, Some(datatype)) => write!(f, "{:?}^^<{datatype}>", literal.value),
                (None, None) => write!(f, "{:?}", literal.value),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: Node,
    pub predicate: String,
    pub object: Node,
}

impl Triple {
    pub fn new(subject: Node, predicate: impl Into<String>, object: Node) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
        }
    }
}

/// Append-only triple set accumulated over one harvest run.
///
/// Duplicate triples are ignored. Iteration follows insertion order so that
/// every query over the graph is deterministic.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    triples: Vec<Triple>,
    seen: HashSet<Triple>,
    by_subject_predicate: HashMap<(Node, String), Vec<usize>>,
    by_predicate_object: HashMap<(String, Node), Vec<usize>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Inserts a triple, returning `false` when it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if self.seen.contains(&triple) {
            return false;
        }
        let index = self.triples.len();
        self.by_subject_predicate
            .entry((triple.subject.clone(), triple.predicate.clone()))
            .or_default()
            .push(index);
        self.by_predicate_object
            .entry((triple.predicate.clone(), triple.object.clone()))
            .or_default()
            .push(index);
        self.seen.insert(triple.clone());
        self.triples.push(triple);
        true
    }

    /// Merges every triple of `other` into this graph and returns how many
    /// were new.
    pub fn extend(&mut self, other: &Graph) -> usize {
        other
            .triples
            .iter()
            .filter(|triple| self.insert((*triple).clone()))
            .count()
    }

    pub fn triples(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    pub fn objects<'a>(
        &'a self,
        subject: &Node,
        predicate: &str,
    ) -> impl Iterator<Item = &'a Node> + 'a {
        self.by_subject_predicate
            .get(&(subject.clone(), predicate.to_string()))
            .into_iter()
            .flatten()
            .map(move |&index| &self.triples[index].object)
    }

    pub fn subjects<'a>(
        &'a self,
        predicate: &str,
        object: &Node,
    ) -> impl Iterator<Item = &'a Node> + 'a {
        self.by_predicate_object
            .get(&(predicate.to_string(), object.clone()))
            .into_iter()
            .flatten()
            .map(move |&index| &self.triples[index].subject)
    }

    /// First object for `(subject, predicate)`, if any.
    pub fn value(&self, subject: &Node, predicate: &str) -> Option<&Node> {
        self.objects(subject, predicate).next()
    }

    pub fn subjects_of_type<'a>(&'a self, class: &str) -> impl Iterator<Item = &'a Node> + 'a {
        self.subjects(rdf::TYPE, &Node::iri(class))
    }

    pub fn datasets(&self) -> impl Iterator<Item = &Node> {
        self.subjects_of_type(dcat::DATASET)
    }

    pub fn catalogs(&self) -> impl Iterator<Item = &Node> {
        self.subjects_of_type(dcat::CATALOG)
    }

    /// Datasets referenced from any catalog via `dcat:dataset`, without
    /// duplicates.
    pub fn datasets_in_catalogs(&self) -> Vec<&Node> {
        let mut seen = HashSet::new();
        self.catalogs()
            .flat_map(|catalog| self.objects(catalog, dcat::DATASET_LINK))
            .filter(|dataset| seen.insert(*dataset))
            .collect()
    }

    /// Next page of a Hydra paged collection. `hydra:next` wins over the
    /// deprecated `hydra:nextPage` on the same collection node.
    pub fn next_page(&self) -> Option<String> {
        for collection in self.subjects_of_type(hydra::PAGED_COLLECTION) {
            let next = self
                .value(collection, hydra::NEXT)
                .or_else(|| self.value(collection, hydra::NEXT_PAGE));
            if let Some(node) = next {
                return Some(node.as_str().to_string());
            }
        }
        None
    }
}
