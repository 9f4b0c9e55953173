use std::{future::Future, time::Duration};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Url;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::models::{AddressSuggestion, ApiConfig, SEARCH_PATH};

/// Characters left as-is in query values. Everything else, space included,
/// is percent-encoded (space becomes `%20`, not `+`).
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search failed ({status}): {message}")]
    Request { status: u16, message: String },

    #[error("search cancelled")]
    Cancelled,

    #[error("invalid search response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid API base URL: {0}")]
    InvalidUrl(String),
}

impl SearchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SearchError::Cancelled)
    }
}

/// Address search backend used by the autocomplete controller.
///
/// Implementations must return [`SearchError::Cancelled`] promptly once
/// `cancel` fires and stop doing work for that call.
pub trait Search: Send + Sync + 'static {
    fn search(
        &self,
        query: &str,
        page_size: u32,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<Vec<AddressSuggestion>, SearchError>> + Send;
}

/// HTTP client for `GET {base}/api/addresses/search`.
#[derive(Debug, Clone)]
pub struct HttpSearchClient {
    http: reqwest::Client,
    base: Url,
}

impl HttpSearchClient {
    pub fn new(cfg: &ApiConfig) -> Result<Self, SearchError> {
        let base = parse_base_url(&cfg.base_url)?;

        let mut b = reqwest::Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if cfg.timeout_ms > 0 {
            b = b.timeout(Duration::from_millis(cfg.timeout_ms));
        }

        Ok(Self {
            http: b.build()?,
            base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Build the request URL for a query.
    pub fn search_url(&self, query: &str, page_size: u32) -> Result<Url, SearchError> {
        search_url(&self.base, query, page_size)
    }
}

impl Search for HttpSearchClient {
    async fn search(
        &self,
        query: &str,
        page_size: u32,
        cancel: CancellationToken,
    ) -> Result<Vec<AddressSuggestion>, SearchError> {
        let url = self.search_url(query, page_size)?;
        log::debug!("GET {}", url);

        let res = until_cancelled(&cancel, self.http.get(url).send()).await??;

        let status = res.status();
        if !status.is_success() {
            // A body that can't be read is reported via the status reason.
            let body = until_cancelled(&cancel, res.text())
                .await?
                .unwrap_or_default();

            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                body
            };

            return Err(SearchError::Request {
                status: status.as_u16(),
                message,
            });
        }

        let body = until_cancelled(&cancel, res.bytes()).await??;
        let out: Vec<AddressSuggestion> = serde_json::from_slice(&body)?;

        Ok(out)
    }
}

/// Parse and validate the configured API base URL.
pub fn parse_base_url(s: &str) -> Result<Url, SearchError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(SearchError::InvalidUrl("no base URL configured".to_string()));
    }

    let url = Url::parse(s).map_err(|e| SearchError::InvalidUrl(format!("{}: {}", s, e)))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(SearchError::InvalidUrl(format!("{}: not an http(s) URL", s)));
    }

    Ok(url)
}

/// The search path is absolute, so any path on the base URL is replaced.
fn search_url(base: &Url, query: &str, page_size: u32) -> Result<Url, SearchError> {
    let mut url = base
        .join(SEARCH_PATH)
        .map_err(|e| SearchError::InvalidUrl(e.to_string()))?;

    let q = utf8_percent_encode(query, QUERY_VALUE);
    url.set_query(Some(&format!("q={}&pageSize={}", q, page_size)));

    Ok(url)
}

/// Run `fut` unless `cancel` fires first. Dropping the future on cancellation
/// aborts the underlying request.
async fn until_cancelled<F: Future>(
    cancel: &CancellationToken,
    fut: F,
) -> Result<F::Output, SearchError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(SearchError::Cancelled),
        out = fut => Ok(out),
    }
}
