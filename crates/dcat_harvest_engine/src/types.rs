use std::fmt;

use dcat_harvest_core::ProfileError;

use crate::parse::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub content: String,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    /// URL actually requested, including any `page` parameter.
    pub requested_url: String,
    pub final_url: String,
    /// Media type without parameters, or a format token for local files.
    pub content_type: Option<String>,
    pub byte_len: u64,
    /// Redirects followed before the final response. Always 0 for local files.
    pub redirect_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    LocalFile,
    InvalidEncoding,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "remote file too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::LocalFile => write!(f, "local file unavailable"),
            FailureKind::InvalidEncoding => write!(f, "content is not valid utf-8"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// A record ready for reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestObject {
    pub guid: String,
    /// Store key derived from the guid.
    pub id: String,
    pub name: Option<String>,
    /// JSON-serialized record, including `id` and `name`.
    pub content: Option<String>,
}

/// Problems recorded while gathering. None of them escape `gather`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GatherError {
    #[error("could not get content from {uri}: {source}")]
    Fetch { uri: String, source: FetchError },
    #[error("error parsing the RDF document {uri}: {source}")]
    Parse { uri: String, source: ParseError },
    #[error("error when processing dataset {dataset}: {source}")]
    Extraction { dataset: String, source: ProfileError },
    #[error("could not serialize dataset {dataset}: {message}")]
    Serialize { dataset: String, message: String },
    #[error("could not get a unique identifier for dataset {dataset}")]
    MissingIdentifier { dataset: String },
}
