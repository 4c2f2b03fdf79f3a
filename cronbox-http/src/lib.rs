//! Minimal HTTP client with safe logging, timeouts, and optional retries.
//!
//! - Request options: headers, `Auth`, timeout, retries
//! - Never logs secret values; `Authorization` is always redacted
//! - Retries 429/5xx with exponential backoff and `Retry-After` support when
//!   a retry budget is configured (the default budget is zero)
//! - Optional *raw* request/response logging via `CRONBOX_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), cronbox_http::HttpError> {
//! let client = cronbox_http::HttpClient::unanchored()?;
//! let page = client
//!     .get_text("https://www.noracooks.com/", cronbox_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, body snippets (truncated), retries, and final errors.
//! Raw lines go to target `http.raw` when `CRONBOX_HTTP_RAW=1`.

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, RETRY_AFTER, USER_AGENT};
use reqwest::{Client, Method, StatusCode, Url};
use serde::Serialize;
use std::env;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "CRONBOX_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024;
const SNIPPET_MAX: usize = 500;

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Render a best-effort curl command for repro/debug, with secrets redacted.
fn make_curl(method: &Method, url: &Url, headers: &HeaderMap, body: Option<&[u8]>) -> String {
    let mut parts = vec!["curl".to_string(), format!("-X{}", method)];
    for (key, val) in redact_headers(headers) {
        parts.push(format!("-H '{}: {}'", key, val.replace('\'', r"'\''")));
    }
    if let Some(bytes) = body {
        match std::str::from_utf8(bytes) {
            Ok(s) => {
                let mut s = s.to_string();
                if s.len() > RAW_MAX_BODY {
                    s.truncate(floor_char_boundary(&s, RAW_MAX_BODY));
                    s.push('…');
                }
                parts.push(format!("-d '{}'", s.replace('\'', r"'\''")));
            }
            Err(_) => parts.push(format!("--data-binary @- # ({} bytes)", bytes.len())),
        }
    }
    parts.push(format!("'{}'", url.as_str()));
    parts.join(" ")
}

/// Redact sensitive headers for logging
fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let val = if key.eq_ignore_ascii_case("authorization") {
                "<redacted>".to_string()
            } else {
                v.to_str().unwrap_or("").to_string()
            };
            (key, val)
        })
        .collect()
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}, request_id={request_id}")]
    Api {
        status: StatusCode,
        message: String,
        request_id: String,
    },
}

impl HttpError {
    fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

// ==============================
// Auth & Request Options
// ==============================

/// Authentication strategies supported by the HTTP client helpers.
///
/// ```
/// use cronbox_http::Auth;
///
/// let bearer = Auth::Bearer("token");
/// match bearer {
///     Auth::Bearer(value) => assert_eq!(value, "token"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Clone, Debug)]
pub enum Auth<'a> {
    /// Authorization: Bearer <token>
    Bearer(&'a str),
    None,
}

impl Auth<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Auth::Bearer(_) => "bearer",
            Auth::None => "none",
        }
    }
}

/// Per-request tuning knobs for the HTTP client.
///
/// ```
/// use cronbox_http::RequestOpts;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     ..Default::default()
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// assert!(opts.retries.is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub retries: Option<usize>,
    pub auth: Option<Auth<'a>>,
    pub headers: Option<HeaderMap>,
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    base: Option<Url>,
    inner: Client,
    user_agent: Option<HeaderValue>,
    pub default_timeout: Duration,
    pub max_retries: usize,
}

impl HttpClient {
    /// Construct a client anchored to a base URL; relative paths are joined onto it.
    ///
    /// ```no_run
    /// use cronbox_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://hooks.example.com")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(30));
    /// assert_eq!(client.max_retries, 0);
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let mut client = Self::unanchored()?;
        client.base = Some(base);
        Ok(client)
    }

    /// Construct a client without a base; every path must be an absolute URL.
    pub fn unanchored() -> Result<Self, HttpError> {
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base: None,
            inner,
            user_agent: None,
            default_timeout: Duration::from_secs(30),
            max_retries: 0,
        })
    }

    /// Override the default timeout.
    ///
    /// ```no_run
    /// use cronbox_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::unanchored()?.with_timeout(Duration::from_secs(2));
    /// assert_eq!(client.default_timeout, Duration::from_secs(2));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// Override the default retry budget (zero unless set).
    pub fn with_retries(mut self, n: usize) -> Self {
        self.max_retries = n;
        self
    }

    /// Send this `User-Agent` on every request.
    pub fn with_user_agent(mut self, agent: &str) -> Result<Self, HttpError> {
        let value = HeaderValue::from_str(agent)
            .map_err(|e| HttpError::Build(format!("invalid user agent: {e}")))?;
        self.user_agent = Some(value);
        Ok(self)
    }

    /// GET a page and decode the body as UTF-8 text.
    pub async fn get_text(&self, path: &str, opts: RequestOpts<'_>) -> Result<String, HttpError> {
        let (_, bytes) = self.execute(Method::GET, path, None, opts).await?;
        String::from_utf8(bytes).map_err(|e| {
            let snippet = snip_body(e.as_bytes());
            HttpError::Decode(format!("body is not valid UTF-8: {}", e.utf8_error()), snippet)
        })
    }

    /// POST JSON where the response body is irrelevant; returns the success status.
    pub async fn post_json_no_content<B>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOpts<'_>,
    ) -> Result<StatusCode, HttpError>
    where
        B: Serialize + ?Sized,
    {
        let payload = encode_json(body)?;
        let (status, _) = self.execute(Method::POST, path, Some(payload), opts).await?;
        Ok(status)
    }

    fn resolve(&self, path: &str) -> Result<Url, HttpError> {
        if let Ok(abs) = Url::parse(path) {
            return Ok(abs);
        }
        match &self.base {
            Some(base) => base.join(path).map_err(|e| HttpError::Url(e.to_string())),
            None => Err(HttpError::Url(format!(
                "relative path '{path}' on a client without a base URL"
            ))),
        }
    }

    // ==============================
    // Core request implementation
    // ==============================

    async fn execute(
        &self,
        method: Method,
        path: &str,
        json_body: Option<Vec<u8>>,
        opts: RequestOpts<'_>,
    ) -> Result<(StatusCode, Vec<u8>), HttpError> {
        let url = self.resolve(path)?;
        let max_retries = opts.retries.unwrap_or(self.max_retries);
        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        let auth_kind = opts.auth.as_ref().map_or("none", Auth::kind);
        let req_id = uuid::Uuid::new_v4().simple().to_string();
        let mut attempt = 0usize;

        loop {
            // ----- Build request -----
            let mut rb = self
                .inner
                .request(method.clone(), url.clone())
                .timeout(timeout);

            if let Some(ua) = &self.user_agent {
                rb = rb.header(USER_AGENT, ua.clone());
            }
            if let Some(hdrs) = &opts.headers {
                rb = rb.headers(hdrs.clone());
            }
            if let Some(bytes) = &json_body {
                rb = rb
                    .header(CONTENT_TYPE, "application/json")
                    .body(bytes.clone());
            }
            match &opts.auth {
                Some(Auth::Bearer(tok)) => {
                    rb = rb.bearer_auth(sanitize_token(tok)?);
                }
                Some(Auth::None) | None => {}
            }

            tracing::debug!(
                req_id=%req_id,
                attempt=attempt + 1,
                max_retries,
                method=%method,
                host_path=%format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
                timeout_ms=timeout.as_millis() as u64,
                auth_kind,
                has_body=%json_body.is_some(),
                "http.request.start"
            );

            if raw_enabled() {
                let merged = opts.headers.clone().unwrap_or_default();
                let curl = make_curl(&method, &url, &merged, json_body.as_deref());
                tracing::debug!(target: "http.raw", %req_id, %curl, "request");
            }

            // ----- Send -----
            let t0 = std::time::Instant::now();
            let resp = match rb.send().await {
                Ok(resp) => resp,
                Err(err) => {
                    let error = HttpError::from_transport(&err);
                    if attempt < max_retries {
                        attempt += 1;
                        let delay = backoff(attempt);
                        tracing::warn!(
                            req_id=%req_id,
                            attempt,
                            max_retries,
                            backoff_ms=delay.as_millis() as u64,
                            message=%error,
                            "http.retrying.network_send"
                        );
                        sleep(delay).await;
                        continue;
                    }
                    tracing::warn!(req_id=%req_id, attempt, message=%error, "http.network_error.send");
                    return Err(error);
                }
            };
            let status = resp.status();
            let headers = resp.headers().clone();
            let bytes = match resp.bytes().await {
                Ok(bytes) => bytes.to_vec(),
                Err(err) => {
                    let error = HttpError::from_transport(&err);
                    if attempt < max_retries {
                        attempt += 1;
                        let delay = backoff(attempt);
                        tracing::warn!(
                            req_id=%req_id,
                            attempt,
                            max_retries,
                            backoff_ms=delay.as_millis() as u64,
                            message=%error,
                            "http.retrying.network_body"
                        );
                        sleep(delay).await;
                        continue;
                    }
                    tracing::warn!(req_id=%req_id, attempt, message=%error, "http.network_error.body");
                    return Err(error);
                }
            };
            let dur_ms = t0.elapsed().as_millis() as u64;

            let req_hdr_id = headers
                .get("x-request-id")
                .or_else(|| headers.get("x-correlation-id"))
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-")
                .to_string();

            tracing::debug!(
                req_id=%req_id,
                %status,
                duration_ms=dur_ms,
                body_len=bytes.len(),
                x_request_id=%req_hdr_id,
                "http.response.headers"
            );

            if raw_enabled() {
                let hdrs = redact_headers(&headers);
                let end = bytes.len().min(RAW_MAX_BODY);
                let text = String::from_utf8_lossy(&bytes[..end]);
                tracing::info!(
                    target:"http.raw",
                    %req_id,
                    status=%status,
                    duration_ms=dur_ms,
                    headers=?hdrs,
                    body=%text,
                    truncated=bytes.len() > RAW_MAX_BODY
                );
            }

            if status.is_success() {
                return Ok((status, bytes));
            }

            // ----- Non-success: maybe retry -----
            let snippet = snip_body(&bytes);
            let is_429 = status == StatusCode::TOO_MANY_REQUESTS;
            let is_5xx = status.is_server_error();

            if (is_429 || is_5xx) && attempt < max_retries {
                attempt += 1;
                let delay = match retry_after_delay_secs(&headers) {
                    Some(secs) => Duration::from_secs(secs),
                    None if is_429 => backoff(attempt).max(Duration::from_millis(1100)),
                    None => backoff(attempt),
                };
                tracing::warn!(
                    req_id=%req_id,
                    %status,
                    attempt,
                    max_retries,
                    backoff_ms=delay.as_millis() as u64,
                    body_snippet=%snippet,
                    "http.retrying"
                );
                sleep(delay).await;
                continue;
            }

            tracing::warn!(
                req_id=%req_id,
                %status,
                x_request_id=%req_hdr_id,
                body_snippet=%snippet,
                "http.error"
            );
            return Err(HttpError::Api {
                status,
                message: snippet,
                request_id: req_hdr_id,
            });
        }
    }
}

// ==============================
// Helpers
// ==============================

fn backoff(attempt: usize) -> Duration {
    let shift = attempt.saturating_sub(1).min(10) as u32;
    Duration::from_millis(200u64.saturating_mul(1 << shift))
}

fn encode_json<B: Serialize + ?Sized>(body: &B) -> Result<Vec<u8>, HttpError> {
    serde_json::to_vec(body).map_err(|e| HttpError::Build(format!("json encode failed: {e}")))
}

fn retry_after_delay_secs(h: &HeaderMap) -> Option<u64> {
    h.get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())?
        .parse()
        .ok()
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    let mut idx = max.min(s.len());
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > SNIPPET_MAX {
        snip.truncate(floor_char_boundary(&snip, SNIPPET_MAX));
        snip.push_str("...");
    }
    snip
}

fn sanitize_token(raw: &str) -> Result<String, HttpError> {
    let mut s = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string();
    s.retain(|ch| !ch.is_ascii_whitespace());

    if !s.is_ascii() {
        return Err(HttpError::Build("token contains non-ASCII bytes".into()));
    }
    if s.bytes().any(|b| b < 0x20 || b == 0x7F) {
        return Err(HttpError::Build("token contains control characters".into()));
    }
    HeaderValue::from_str(&format!("Bearer {}", s))
        .map_err(|e| HttpError::Build(format!("invalid Authorization header: {e}")))?;
    Ok(s)
}
