//! Shared HTTP client, SSE line parsing, and header helpers.

use std::sync::OnceLock;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::JoaoError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .pool_max_idle_per_host(10)
            .build()
            .expect("Failed to build HTTP client")
    })
}

/// Default headers for a Bearer-token API.
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(value) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, value);
    }
    headers
}

/// Parse an SSE `data:` line, returning `None` for non-data lines and the
/// `[DONE]` sentinel.
pub fn parse_sse_data(line: &str) -> Option<&str> {
    let data = line.strip_prefix("data: ")?;
    (data != "[DONE]").then_some(data)
}

/// Map a non-success HTTP status to a typed error.
pub fn status_to_error(status: u16, body: &str) -> JoaoError {
    match status {
        401 | 403 => JoaoError::Authentication(body.to_string()),
        429 => JoaoError::RateLimited {
            retry_after_ms: retry_after_from_body(body),
        },
        _ => JoaoError::api(status, body),
    }
}

fn retry_after_from_body(body: &str) -> Option<u64> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let seconds = value.get("error")?.get("retry_after")?.as_f64()?;
    Some((seconds * 1000.0) as u64)
}
