//! Paginated query client.
//!
//! [`LogsQueryClient`] issues one logical KQL query against a workspace (or
//! a cross-workspace set), follows continuation tokens until the backend
//! stops issuing them, and hands back the collected pages. The concrete
//! transport is abstracted behind [`QueryTransport`]: production hosts wrap
//! their HTTP stack of choice, tests script pages in memory.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tracing::debug;

use crate::auth::{LOG_ANALYTICS_SCOPE, TokenCredential};
use crate::error::{Error, Result, TransportError};
use crate::response::LogsResponse;
use crate::wire;

/// Default ceiling on result pages per logical query. Exceeding it is fatal
/// rather than a silent truncation.
pub const DEFAULT_PAGE_LIMIT: usize = 10;

/// Extra client-side allowance over the server-side wait hint, so the
/// transport does not race the backend's own timeout response.
pub const CLIENT_TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Query targets and options
// ---------------------------------------------------------------------------

/// The workspace(s) a query runs against. For a cross-workspace query the
/// first entry is the request target and the full list rides in the body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Workspaces {
    One(String),
    Many(Vec<String>),
}

impl Workspaces {
    fn target(&self) -> Result<&str> {
        match self {
            Self::One(id) => Ok(id),
            Self::Many(ids) => ids.first().map(String::as_str).ok_or_else(|| {
                Error::InvalidArgument("workspace list must not be empty".into())
            }),
        }
    }

    fn body_list(&self) -> Option<&[String]> {
        match self {
            Self::One(_) => None,
            Self::Many(ids) => Some(ids),
        }
    }
}

impl From<&str> for Workspaces {
    fn from(id: &str) -> Self {
        Self::One(id.to_string())
    }
}

impl From<String> for Workspaces {
    fn from(id: String) -> Self {
        Self::One(id)
    }
}

impl From<Vec<String>> for Workspaces {
    fn from(ids: Vec<String>) -> Self {
        Self::Many(ids)
    }
}

/// Per-query knobs. All optional; the orchestrator pins its own values.
#[derive(Clone, Debug, Default)]
pub struct QueryOptions {
    /// ISO-8601 timespan filter forwarded to the backend.
    pub timespan: Option<String>,
    /// Server-side wait hint. Also stretches the client-side timeout by
    /// [`CLIENT_TIMEOUT_MARGIN`].
    pub server_timeout: Option<Duration>,
    /// Transport-level retry hint. The orchestrator sets this to zero so
    /// retry decisions happen in exactly one place.
    pub retries: Option<u32>,
}

// ---------------------------------------------------------------------------
// Transport seam
// ---------------------------------------------------------------------------

/// One fully-built backend request. The transport only has to put it on the
/// wire: POST `body()` to the target workspace's query endpoint with
/// `headers()` applied and `client_timeout()` as the socket deadline.
#[derive(Clone, Debug)]
pub struct QueryRequest {
    pub workspace: String,
    pub workspaces: Option<Vec<String>>,
    pub query: String,
    pub timespan: Option<String>,
    pub server_timeout: Option<Duration>,
    pub retries: Option<u32>,
    pub continuation_token: Option<String>,
    pub bearer_token: String,
}

impl QueryRequest {
    /// JSON request body in the backend's shape.
    pub fn body(&self) -> Value {
        let mut body = json!({ "query": self.query });
        if let Some(timespan) = &self.timespan {
            body["timespan"] = json!(timespan);
        }
        if let Some(workspaces) = &self.workspaces {
            body["workspaces"] = json!(workspaces);
        }
        if let Some(token) = &self.continuation_token {
            body["continuationToken"] = json!(token);
        }
        body
    }

    /// Headers to apply: bearer auth plus the server-side wait hint.
    pub fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![(
            "Authorization".to_string(),
            format!("Bearer {}", self.bearer_token),
        )];
        if let Some(timeout) = self.server_timeout {
            headers.push(("Prefer".to_string(), format!("wait={}", timeout.as_secs())));
        }
        headers
    }

    /// Socket deadline: the server hint plus a safety margin, if hinted.
    pub fn client_timeout(&self) -> Option<Duration> {
        self.server_timeout.map(|t| t + CLIENT_TIMEOUT_MARGIN)
    }
}

/// One raw page as it came off the wire.
#[derive(Clone, Debug)]
pub struct RawPage {
    pub status: u16,
    pub body: String,
}

/// Sends one request and returns one raw page. Implementations surface
/// timeouts and connection failures as [`TransportError`]; anything the
/// backend answered, however unhappy, comes back as a [`RawPage`].
pub trait QueryTransport: Send + Sync {
    fn send(&self, request: &QueryRequest) -> std::result::Result<RawPage, TransportError>;
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Executes logical queries, following continuation tokens page by page.
pub struct LogsQueryClient {
    transport: Arc<dyn QueryTransport>,
    credential: Arc<dyn TokenCredential>,
    page_limit: usize,
}

impl LogsQueryClient {
    pub fn new(transport: Arc<dyn QueryTransport>, credential: Arc<dyn TokenCredential>) -> Self {
        Self {
            transport,
            credential,
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }

    /// Override the page ceiling (testing and unusually wide result sets).
    pub fn with_page_limit(mut self, page_limit: usize) -> Self {
        self.page_limit = page_limit;
        self
    }

    /// Run one logical query and collect every result page.
    ///
    /// Fails with [`Error::ResultSetTooLarge`] if the backend still offers a
    /// continuation token once `page_limit` pages have been fetched, with
    /// [`Error::QueryFailed`] on any non-success status, and with a transient
    /// [`Error::Transport`] when the transport itself gives out.
    pub fn query_pages(
        &self,
        workspaces: impl Into<Workspaces>,
        query: &str,
        options: &QueryOptions,
    ) -> Result<Vec<LogsResponse>> {
        let workspaces = workspaces.into();
        let token = self.credential.get_token(&[LOG_ANALYTICS_SCOPE])?;
        let mut request = QueryRequest {
            workspace: workspaces.target()?.to_string(),
            workspaces: workspaces.body_list().map(<[String]>::to_vec),
            query: query.to_string(),
            timespan: options.timespan.clone(),
            server_timeout: options.server_timeout,
            retries: options.retries,
            continuation_token: None,
            bearer_token: token.token,
        };

        let mut pages: Vec<LogsResponse> = Vec::new();
        loop {
            let raw = self.transport.send(&request)?;
            if !(200..300).contains(&raw.status) {
                return Err(Error::QueryFailed {
                    status: raw.status,
                    body: raw.body,
                });
            }
            let page = wire::parse_response(&raw.body)?;
            let next = page.continuation_token.clone();
            debug!(
                workspace = %request.workspace,
                page = pages.len() + 1,
                rows = page.primary_table().map(|t| t.rows.len()).unwrap_or(0),
                has_more = next.is_some(),
                "fetched result page"
            );
            pages.push(page);
            match next {
                None => break,
                Some(token) => {
                    if pages.len() >= self.page_limit {
                        return Err(Error::ResultSetTooLarge {
                            ceiling: self.page_limit,
                        });
                    }
                    request.continuation_token = Some(token);
                }
            }
        }
        Ok(pages)
    }

    /// Run one logical query and merge its pages into a single response.
    pub fn query(
        &self,
        workspaces: impl Into<Workspaces>,
        query: &str,
        options: &QueryOptions,
    ) -> Result<LogsResponse> {
        LogsResponse::merge(self.query_pages(workspaces, query, options)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
