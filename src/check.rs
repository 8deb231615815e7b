use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::Client;
use reqwest::header::HeaderMap;
use serde_json::Value;
use tracing::debug;

use crate::types::{CheckFailure, CheckResult, CheckSpec, Method, Outcome, Probe, Target};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
const PREVIEW_CHARS: usize = 100;

const ALLOW_ORIGIN: &str = "access-control-allow-origin";
const ALLOW_METHODS: &str = "access-control-allow-methods";

/// What came back from the server, before any probe looks at it.
#[derive(Debug)]
struct Fetched {
    status: u16,
    headers: HeaderMap,
    body: String,
}

/// Sends each check's request and classifies what comes back.
pub struct Checker {
    client: Client,
    api_url: String,
    dashboard_url: String,
}

impl Checker {
    pub fn new(api_url: &str, dashboard_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_url: api_url.to_string(),
            dashboard_url: dashboard_url.to_string(),
        })
    }

    pub fn base_url(&self, target: Target) -> &str {
        match target {
            Target::Api => &self.api_url,
            Target::Dashboard => &self.dashboard_url,
        }
    }

    /// Run one check against the server its spec targets.
    pub async fn run(&self, spec: &CheckSpec) -> CheckResult {
        self.check(self.base_url(spec.target), spec).await
    }

    /// Run one check against `base_url`. Never fails: every problem ends up in the result.
    pub async fn check(&self, base_url: &str, spec: &CheckSpec) -> CheckResult {
        let url = join_url(base_url, &spec.path);
        let fetched = self.fetch(spec.method, &url).await;

        let (outcome, http_status, detail, failure) = match fetched {
            Err(failure) => (Outcome::Fail, None, failure.to_string(), Some(failure)),
            Ok(resp) => {
                let status = Some(resp.status);
                let (outcome, detail, failure) = match spec.probe {
                    Probe::Reachable => (Outcome::Pass, format!("status {}", resp.status), None),
                    Probe::Json => classify_json(&resp.body),
                    Probe::Cors => classify_cors(&resp.headers),
                    Probe::Schema => classify_schema(&resp.body, &spec.required_fields),
                };
                (outcome, status, detail, failure)
            }
        };

        CheckResult {
            spec: spec.clone(),
            url,
            outcome,
            http_status,
            detail,
            failure,
        }
    }

    async fn fetch(&self, method: Method, url: &str) -> Result<Fetched, CheckFailure> {
        let start = Instant::now();
        debug!("{} {}", method, url);

        let mut request = self.client.request(method.as_reqwest(), url);
        if method == Method::Post {
            request = request.json(&serde_json::json!({}));
        }

        let response = request.send().await.map_err(|e| classify_transport(&e))?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(|e| classify_transport(&e))?;

        debug!(
            "{} {} -> {} ({} bytes) in {:?}",
            method,
            url,
            status,
            body.len(),
            start.elapsed()
        );

        Ok(Fetched { status, headers, body })
    }
}

pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

fn classify_transport(err: &reqwest::Error) -> CheckFailure {
    if err.is_timeout() {
        CheckFailure::Timeout
    } else if err.is_connect() {
        CheckFailure::ConnectionRefused
    } else {
        CheckFailure::Transport(err.to_string())
    }
}

fn classify_json(body: &str) -> (Outcome, String, Option<CheckFailure>) {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => (Outcome::Pass, truncate(&value.to_string(), PREVIEW_CHARS), None),
        Err(e) if !body.is_empty() => (
            Outcome::Warn,
            truncate(body, PREVIEW_CHARS),
            Some(CheckFailure::MalformedJson(e.to_string())),
        ),
        Err(_) => (
            Outcome::Fail,
            CheckFailure::EmptyResponse.to_string(),
            Some(CheckFailure::EmptyResponse),
        ),
    }
}

fn classify_cors(headers: &HeaderMap) -> (Outcome, String, Option<CheckFailure>) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    match header(ALLOW_ORIGIN) {
        Some(origin) => {
            let methods = header(ALLOW_METHODS).unwrap_or_else(|| "NOT SET".to_string());
            (Outcome::Pass, format!("origin {origin}, methods {methods}"), None)
        }
        None => {
            let failure = CheckFailure::MissingHeader(ALLOW_ORIGIN.to_string());
            (Outcome::Warn, failure.to_string(), Some(failure))
        }
    }
}

fn classify_schema(body: &str, required: &[String]) -> (Outcome, String, Option<CheckFailure>) {
    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            let failure = if body.is_empty() {
                CheckFailure::EmptyResponse
            } else {
                CheckFailure::MalformedJson(e.to_string())
            };
            return (Outcome::Fail, failure.to_string(), Some(failure));
        }
    };

    let missing = missing_fields(&value, required);
    let pretty = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());

    if missing.is_empty() {
        (Outcome::Pass, pretty, None)
    } else {
        (Outcome::Fail, pretty, Some(CheckFailure::MissingFields(missing)))
    }
}

/// Names from `required` that `value` does not carry, in the order given.
pub fn missing_fields(value: &Value, required: &[String]) -> Vec<String> {
    required
        .iter()
        .filter(|field| value.get(field.as_str()).is_none())
        .cloned()
        .collect()
}

/// Cut `s` down to at most `max` characters.
pub fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
