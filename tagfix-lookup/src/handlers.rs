//! Request decoding and dispatch
//!
//! Operations:
//! - `search` - ranked candidates for a query
//! - `stats`  - engine statistics and service counters
//! - `health` - whether a snapshot is loaded
//! - `reload` - rebuild from the catalogue files

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tagfix_core::ReloadSummary;
use tracing::{debug, warn};

use crate::service::{HealthResponse, LookupService, SearchResponse, StatsResponse};

/// A decoded request line
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Search {
        query: String,
        #[serde(default)]
        limit: Option<usize>,
        #[serde(default)]
        fuzzy: Option<bool>,
        #[serde(default)]
        include_strategy: bool,
    },
    Stats,
    Health,
    Reload,
}

/// A request line with its optional correlation id
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Envelope {
    /// Echoed back so callers can match responses to requests
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(flatten)]
    pub request: Request,
}

impl Envelope {
    /// Whether the request must leave the read loop to run.
    pub fn is_background(&self) -> bool {
        matches!(self.request, Request::Reload)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub detail: String,
}

/// One response line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Search(SearchResponse),
    Stats(StatsResponse),
    Health(HealthResponse),
    Reload(ReloadSummary),
    Error(ErrorResponse),
}

impl Response {
    pub fn error(error: &str, detail: impl ToString) -> Self {
        Response::Error(ErrorResponse {
            error: error.to_string(),
            detail: detail.to_string(),
        })
    }
}

/// Decode one raw request line.
///
/// Lines that are not UTF-8 or not a known request come back as the error
/// response to send.
pub fn decode(line: &[u8]) -> Result<Envelope, Response> {
    let text = std::str::from_utf8(line).map_err(|e| {
        warn!(error = %e, "Rejected request with invalid UTF-8");
        Response::error("invalid request", e)
    })?;
    serde_json::from_str(text).map_err(|e| {
        warn!(error = %e, "Rejected malformed request");
        Response::error("invalid request", e)
    })
}

/// Decode one line, run it, and encode the response.
///
/// Never fails: bad input becomes an error response.
pub async fn handle_line(service: &Arc<LookupService>, line: &str) -> String {
    match decode(line.as_bytes()) {
        Ok(envelope) => respond(service, envelope).await,
        Err(response) => encode(None, &response),
    }
}

/// Run a decoded request and encode its response line.
///
/// Reloads and fuzzy searches run on the blocking pool so the caller's
/// task never stalls on a full build or a catalogue scan.
pub async fn respond(service: &Arc<LookupService>, envelope: Envelope) -> String {
    let response = dispatch(service, envelope.request).await;
    encode(envelope.id, &response)
}

async fn dispatch(service: &Arc<LookupService>, request: Request) -> Response {
    debug!(?request, "Handling request");
    match request {
        Request::Search {
            query,
            limit,
            fuzzy,
            include_strategy,
        } => {
            let max = service.max_query_len();
            if query.chars().count() > max {
                return Response::error(
                    "invalid request",
                    format!("query exceeds {max} characters"),
                );
            }
            if !service.fuzzy_enabled(fuzzy) {
                return Response::Search(service.search(&query, limit, fuzzy, include_strategy));
            }
            let service = Arc::clone(service);
            match tokio::task::spawn_blocking(move || {
                service.search(&query, limit, fuzzy, include_strategy)
            })
            .await
            {
                Ok(response) => Response::Search(response),
                Err(e) => Response::error("search failed", e),
            }
        }
        Request::Stats => Response::Stats(service.stats()),
        Request::Health => Response::Health(service.health()),
        Request::Reload => {
            let service = Arc::clone(service);
            match tokio::task::spawn_blocking(move || service.reload()).await {
                Ok(Ok(summary)) => Response::Reload(summary),
                Ok(Err(e)) => Response::error("reload failed", e),
                Err(e) => Response::error("reload failed", e),
            }
        }
    }
}

/// Encode a response line, echoing `id` when the request carried one.
pub fn encode(id: Option<Value>, response: &Response) -> String {
    let mut value = match serde_json::to_value(response) {
        Ok(value) => value,
        Err(e) => return fallback_error(&e.to_string()),
    };
    if let (Some(id), Value::Object(map)) = (id, &mut value) {
        map.insert("id".to_string(), id);
    }
    value.to_string()
}

fn fallback_error(detail: &str) -> String {
    serde_json::json!({ "error": "internal error", "detail": detail }).to_string()
}
