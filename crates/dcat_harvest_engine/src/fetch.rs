use std::path::Path;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use futures_util::StreamExt;
use harvest_logging::{harvest_debug, harvest_warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::{FailureKind, FetchError, FetchMetadata, FetchOutput};

pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 50;

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    /// `Accept` header sent with every HTTP request.
    pub accept: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: DEFAULT_MAX_FILE_SIZE_MB * 1024 * 1024,
            accept: "text/turtle, application/rdf+xml;q=0.9, application/ld+json;q=0.8, */*;q=0.1"
                .to_string(),
        }
    }
}

/// Retrieves raw RDF documents.
///
/// `content_type` is a format hint used only when the source does not report
/// a type itself.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(
        &self,
        uri: &str,
        page: u32,
        content_type: Option<&str>,
    ) -> Result<FetchOutput, FetchError>;
}

/// Fetches over HTTP(S), falling back to the local filesystem for anything
/// that is not an `http` URI.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    fn build_client(&self, redirect_counter: Arc<AtomicUsize>) -> Result<reqwest::Client, FetchError> {
        let redirect_limit = self.settings.redirect_limit;
        let policy = reqwest::redirect::Policy::custom(move |attempt| {
            // `previous` holds every URL requested so far, the original included.
            let count = attempt.previous().len();
            if count > redirect_limit {
                attempt.error("redirect limit exceeded")
            } else {
                redirect_counter.store(count, Ordering::Relaxed);
                attempt.follow()
            }
        });

        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .redirect(policy)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }

    fn too_large(&self, actual: u64) -> FetchError {
        FetchError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(actual),
            },
            format!(
                "remote file is too big, allowed file size: {}, actual: {}",
                self.settings.max_bytes, actual
            ),
        )
    }

    async fn fetch_local(
        &self,
        path: &str,
        content_type: Option<&str>,
    ) -> Result<FetchOutput, FetchError> {
        let meta = tokio::fs::metadata(path)
            .await
            .map_err(|err| FetchError::new(FailureKind::LocalFile, format!("{path}: {err}")))?;
        if !meta.is_file() {
            return Err(FetchError::new(
                FailureKind::LocalFile,
                format!("{path}: not a file"),
            ));
        }
        if meta.len() > self.settings.max_bytes {
            return Err(self.too_large(meta.len()));
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| FetchError::new(FailureKind::LocalFile, format!("{path}: {err}")))?;
        let byte_len = bytes.len() as u64;
        let content = String::from_utf8(bytes)
            .map_err(|err| FetchError::new(FailureKind::InvalidEncoding, err.to_string()))?;

        let content_type = content_type
            .map(str::to_string)
            .or_else(|| guess_format(path).map(str::to_string));

        Ok(FetchOutput {
            content,
            metadata: FetchMetadata {
                original_url: path.to_string(),
                requested_url: path.to_string(),
                final_url: path.to_string(),
                content_type,
                byte_len,
                redirect_count: 0,
            },
        })
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(
        &self,
        uri: &str,
        page: u32,
        content_type: Option<&str>,
    ) -> Result<FetchOutput, FetchError> {
        if !uri.to_ascii_lowercase().starts_with("http") {
            return self.fetch_local(uri, content_type).await;
        }

        let requested = paged_url(uri, page);
        let parsed = url::Url::parse(&requested)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let redirect_counter = Arc::new(AtomicUsize::new(0));
        let client = self.build_client(redirect_counter.clone())?;

        harvest_debug!("Getting file {}", requested);
        let response = client
            .get(parsed)
            .header(ACCEPT, self.settings.accept.as_str())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                format!("server responded with {status}"),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(self.too_large(content_len));
            }
        }

        let final_url = response.url().to_string();
        let reported_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(media_type)
            .filter(|value| !value.is_empty());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(next_len));
            }
            bytes.extend_from_slice(&chunk);
        }

        let byte_len = bytes.len() as u64;
        let content = String::from_utf8(bytes)
            .map_err(|err| FetchError::new(FailureKind::InvalidEncoding, err.to_string()))?;

        if reported_type.is_none() && content_type.is_none() {
            harvest_warn!("No content type reported for {}", requested);
        }

        Ok(FetchOutput {
            content,
            metadata: FetchMetadata {
                original_url: uri.to_string(),
                requested_url: requested,
                final_url,
                content_type: reported_type.or_else(|| content_type.map(str::to_string)),
                byte_len,
                redirect_count: redirect_counter.load(Ordering::Relaxed),
            },
        })
    }
}

/// Adds `page=N` for pages after the first, keeping any existing query.
pub fn paged_url(uri: &str, page: u32) -> String {
    if page <= 1 {
        return uri.to_string();
    }
    let separator = if uri.contains('?') { '&' } else { '?' };
    format!("{uri}{separator}page={page}")
}

/// Content-Type header value up to the first `;`.
fn media_type(header: &str) -> String {
    header
        .split(';')
        .next()
        .unwrap_or(header)
        .trim()
        .to_string()
}

/// Format token for a local file, from its extension.
pub fn guess_format(path: &str) -> Option<&'static str> {
    let extension = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "ttl" => Some("ttl"),
        "rdf" | "xml" | "owl" => Some("xml"),
        "jsonld" | "json" => Some("jsonld"),
        "nt" => Some("nt"),
        "n3" => Some("n3"),
        _ => None,
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paged_url_respects_existing_query() {
        assert_eq!(paged_url("https://a.org/c", 1), "https://a.org/c");
        assert_eq!(paged_url("https://a.org/c", 2), "https://a.org/c?page=2");
        assert_eq!(paged_url("https://a.org/c?x=1", 3), "https://a.org/c?x=1&page=3");
    }

    #[test]
    fn media_type_drops_parameters() {
        assert_eq!(media_type("text/turtle; charset=UTF-8"), "text/turtle");
    }

    #[test]
    fn formats_from_extension() {
        assert_eq!(guess_format("/data/catalog.TTL"), Some("ttl"));
        assert_eq!(guess_format("catalog.rdf"), Some("xml"));
        assert_eq!(guess_format("catalog.jsonld"), Some("jsonld"));
        assert_eq!(guess_format("catalog"), None);
    }
}
