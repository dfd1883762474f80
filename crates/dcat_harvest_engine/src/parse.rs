use std::fmt;

use dcat_harvest_core::{Graph, Literal, Node, Triple};
use harvest_logging::harvest_debug;
use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::Term;

/// Serialization of a fetched document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Turtle,
    NTriples,
    N3,
    RdfXml,
    JsonLd,
    /// Decide from the content itself.
    Auto,
}

impl DocumentFormat {
    /// Normalizes a format token, file extension or media type.
    ///
    /// `ttl` means Turtle and `jsonld` JSON-LD. `rdf`, `xml` and unknown or
    /// empty tokens are left to content sniffing.
    pub fn from_hint(hint: Option<&str>) -> Self {
        let Some(hint) = hint else {
            return DocumentFormat::Auto;
        };
        let token = hint
            .split(';')
            .next()
            .unwrap_or(hint)
            .trim()
            .to_ascii_lowercase();
        match token.as_str() {
            "ttl" | "turtle" | "text/turtle" | "application/x-turtle" => DocumentFormat::Turtle,
            "nt" | "ntriples" | "n-triples" | "application/n-triples" => DocumentFormat::NTriples,
            "n3" | "text/n3" => DocumentFormat::N3,
            "jsonld" | "json-ld" | "application/ld+json" => DocumentFormat::JsonLd,
            "application/rdf+xml" => DocumentFormat::RdfXml,
            _ => DocumentFormat::Auto,
        }
    }

    /// Guesses the format of `content` from its first significant character.
    pub fn sniff(content: &str) -> Self {
        let trimmed = content.trim_start_matches('\u{feff}').trim_start();
        match trimmed.chars().next() {
            Some('<') if !looks_like_turtle_iri(trimmed) => DocumentFormat::RdfXml,
            Some('{') | Some('[') => DocumentFormat::JsonLd,
            _ => DocumentFormat::Turtle,
        }
    }

    fn resolve(self, content: &str) -> Self {
        match self {
            DocumentFormat::Auto => Self::sniff(content),
            other => other,
        }
    }

    fn rdf_format(self) -> Option<RdfFormat> {
        match self {
            DocumentFormat::Turtle => Some(RdfFormat::Turtle),
            DocumentFormat::NTriples => Some(RdfFormat::NTriples),
            DocumentFormat::N3 => Some(RdfFormat::N3),
            DocumentFormat::RdfXml => Some(RdfFormat::RdfXml),
            DocumentFormat::JsonLd => RdfFormat::from_extension("jsonld"),
            DocumentFormat::Auto => None,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DocumentFormat::Turtle => "turtle",
            DocumentFormat::NTriples => "n-triples",
            DocumentFormat::N3 => "n3",
            DocumentFormat::RdfXml => "rdf/xml",
            DocumentFormat::JsonLd => "json-ld",
            DocumentFormat::Auto => "auto",
        };
        f.write_str(label)
    }
}

/// A Turtle document may start with an IRI subject, e.g. `<http://...> a ...`.
fn looks_like_turtle_iri(content: &str) -> bool {
    let head: String = content.chars().take(2).collect();
    head != "<?" && head != "<!" && !content.starts_with("<rdf") && {
        let first_token = content.split_whitespace().next().unwrap_or_default();
        first_token.ends_with('>') && !first_token.contains('=') && first_token.contains(':')
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unsupported RDF format {0}")]
    UnsupportedFormat(DocumentFormat),
    #[error("malformed {format} document: {message}")]
    Malformed {
        format: DocumentFormat,
        message: String,
    },
}

/// Parses one RDF document into a fresh graph.
///
/// `base_iri` resolves relative references; it is ignored when it is not an
/// absolute IRI (e.g. a local path).
pub fn parse_document(
    content: &str,
    format_hint: Option<&str>,
    base_iri: Option<&str>,
) -> Result<Graph, ParseError> {
    let format = DocumentFormat::from_hint(format_hint).resolve(content);
    let rdf_format = format
        .rdf_format()
        .ok_or(ParseError::UnsupportedFormat(format))?;

    let mut parser = RdfParser::from_format(rdf_format);
    if let Some(base) = base_iri.filter(|b| b.starts_with("http://") || b.starts_with("https://")) {
        parser = match parser.with_base_iri(base) {
            Ok(with_base) => with_base,
            Err(err) => {
                harvest_debug!("Ignoring base IRI {}: {}", base, err);
                RdfParser::from_format(rdf_format)
            }
        };
    }

    // Blank node labels are scoped to their document; `_:d` on two pages
    // must not become one subject in the run graph.
    let parser = parser.rename_blank_nodes();

    let mut graph = Graph::new();
    for quad in parser.for_reader(content.as_bytes()) {
        let quad = quad.map_err(|err| ParseError::Malformed {
            format,
            message: err.to_string(),
        })?;
        let subject = term_to_node(Term::from(quad.subject)).ok_or_else(|| {
            ParseError::Malformed {
                format,
                message: "unsupported subject term".to_string(),
            }
        })?;
        let object = term_to_node(quad.object).ok_or_else(|| ParseError::Malformed {
            format,
            message: "unsupported object term".to_string(),
        })?;
        graph.insert(Triple::new(subject, quad.predicate.into_string(), object));
    }

    harvest_debug!("Parsed {} triples as {}", graph.len(), format);
    Ok(graph)
}

fn term_to_node(term: Term) -> Option<Node> {
    #[allow(unreachable_patterns)]
    match term {
        Term::NamedNode(node) => Some(Node::Iri(node.into_string())),
        Term::BlankNode(node) => Some(Node::Blank(node.into_string())),
        Term::Literal(literal) => {
            let node = match literal.language() {
                Some(language) => Literal::tagged(literal.value(), language),
                None => Literal::typed(literal.value(), literal.datatype().as_str()),
            };
            Some(Node::Literal(node))
        }
        // Quoted triples have no place in a DCAT record.
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_are_normalized() {
        assert_eq!(DocumentFormat::from_hint(Some("ttl")), DocumentFormat::Turtle);
        assert_eq!(
            DocumentFormat::from_hint(Some("text/turtle; charset=utf-8")),
            DocumentFormat::Turtle
        );
        assert_eq!(DocumentFormat::from_hint(Some("jsonld")), DocumentFormat::JsonLd);
        assert_eq!(DocumentFormat::from_hint(Some("rdf")), DocumentFormat::Auto);
        assert_eq!(DocumentFormat::from_hint(Some("xml")), DocumentFormat::Auto);
        assert_eq!(DocumentFormat::from_hint(Some("")), DocumentFormat::Auto);
        assert_eq!(DocumentFormat::from_hint(None), DocumentFormat::Auto);
    }

    #[test]
    fn sniffing() {
        assert_eq!(
            DocumentFormat::sniff("<?xml version=\"1.0\"?><rdf:RDF/>"),
            DocumentFormat::RdfXml
        );
        assert_eq!(DocumentFormat::sniff("  {\"@id\": \"x\"}"), DocumentFormat::JsonLd);
        assert_eq!(
            DocumentFormat::sniff("@prefix dcat: <http://www.w3.org/ns/dcat#> ."),
            DocumentFormat::Turtle
        );
        assert_eq!(
            DocumentFormat::sniff("<http://example.org/a> a <http://example.org/B> ."),
            DocumentFormat::Turtle
        );
    }

    #[test]
    fn parses_turtle_with_relative_iris() {
        let ttl = r#"
            @prefix dcat: <http://www.w3.org/ns/dcat#> .
            @prefix dct: <http://purl.org/dc/terms/> .
            <dataset/1> a dcat:Dataset ; dct:title "One"@en .
        "#;
        let graph = parse_document(ttl, Some("text/turtle"), Some("https://fdp.example.org/"))
            .unwrap();
        let datasets: Vec<_> = graph.datasets().map(Node::as_str).collect();
        assert_eq!(datasets, vec!["https://fdp.example.org/dataset/1"]);
    }

    #[test]
    fn blank_nodes_are_scoped_per_document() {
        let ttl = r#"
            @prefix dcat: <http://www.w3.org/ns/dcat#> .
            _:d a dcat:Dataset .
        "#;
        let mut graph = parse_document(ttl, Some("ttl"), None).unwrap();
        graph.extend(&parse_document(ttl, Some("ttl"), None).unwrap());
        assert_eq!(graph.datasets().count(), 2);
    }

    #[test]
    fn malformed_turtle_is_reported() {
        let err = parse_document("<a> <b> .", Some("ttl"), None).unwrap_err();
        assert!(matches!(err, ParseError::Malformed { format: DocumentFormat::Turtle, .. }));
    }
}
