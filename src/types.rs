use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Options,
}

impl Method {
    pub fn as_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Options => reqwest::Method::OPTIONS,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Options => write!(f, "OPTIONS"),
        }
    }
}

/// Which server a check is sent to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    #[default]
    Api,
    Dashboard,
}

/// How a check's failure affects the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Failure ends the run after the current section.
    Precondition,
    #[default]
    Standard,
    /// Failure is reported but never counted.
    Advisory,
}

/// What a check looks at in the response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Probe {
    /// Any HTTP response at all.
    Reachable,
    /// Body should parse as JSON.
    #[default]
    Json,
    /// `access-control-allow-origin` should be set.
    Cors,
    /// Body should be a JSON object carrying `required_fields`.
    Schema,
}

fn default_method() -> Method {
    Method::Get
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSpec {
    pub description: String,
    #[serde(default = "default_method")]
    pub method: Method,
    pub path: String,
    #[serde(default)]
    pub target: Target,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub probe: Probe,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_hint: Option<String>,
}

impl CheckSpec {
    /// A plain JSON check against the API server.
    #[cfg(test)]
    pub fn new(method: Method, path: &str, description: &str) -> Self {
        Self {
            description: description.to_string(),
            method,
            path: path.to_string(),
            target: Target::Api,
            role: Role::Standard,
            probe: Probe::Json,
            required_fields: Vec::new(),
            fix_hint: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail,
    Warn,
}

/// Why a check did not pass cleanly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckFailure {
    #[error("connection refused")]
    ConnectionRefused,
    #[error("timeout")]
    Timeout,
    #[error("{0}")]
    Transport(String),
    #[error("empty response")]
    EmptyResponse,
    #[error("malformed JSON: {0}")]
    MalformedJson(String),
    #[error("missing fields: [{}]", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error("{0} not set")]
    MissingHeader(String),
}

#[derive(Debug, Clone)]
pub struct CheckResult {
    pub spec: CheckSpec,
    pub url: String,
    pub outcome: Outcome,
    pub http_status: Option<u16>,
    pub detail: String,
    pub failure: Option<CheckFailure>,
}

/// How a single result lands in the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tally {
    Passed,
    Failed,
    Uncounted,
}

impl CheckResult {
    pub fn tally(&self) -> Tally {
        match self.outcome {
            Outcome::Pass => Tally::Passed,
            Outcome::Fail if self.spec.role == Role::Advisory => Tally::Uncounted,
            Outcome::Fail => Tally::Failed,
            Outcome::Warn => match self.spec.probe {
                // Non-JSON bodies are tolerated as long as the server didn't error.
                Probe::Json => match self.http_status {
                    Some(status) if status < 500 => Tally::Passed,
                    _ => Tally::Failed,
                },
                _ => Tally::Uncounted,
            },
        }
    }

    /// True when this result should stop the run.
    pub fn is_fatal(&self) -> bool {
        self.spec.role == Role::Precondition && self.outcome == Outcome::Fail
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
}

impl RunSummary {
    pub fn record(&mut self, result: &CheckResult) {
        match result.tally() {
            Tally::Passed => self.passed += 1,
            Tally::Failed => self.failed += 1,
            Tally::Uncounted => self.warnings += 1,
        }
    }

    pub fn success(&self) -> bool {
        self.failed == 0
    }

    pub fn exit_code(&self) -> i32 {
        if self.success() { 0 } else { 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(spec: CheckSpec, outcome: Outcome, status: Option<u16>) -> CheckResult {
        CheckResult {
            url: format!("http://localhost:3000{}", spec.path),
            spec,
            outcome,
            http_status: status,
            detail: String::new(),
            failure: None,
        }
    }

    #[test]
    fn test_warn_json_counts_by_status() {
        let spec = CheckSpec::new(Method::Get, "/api/mempool", "Get mempool");
        assert_eq!(result(spec.clone(), Outcome::Warn, Some(404)).tally(), Tally::Passed);
        assert_eq!(result(spec.clone(), Outcome::Warn, Some(499)).tally(), Tally::Passed);
        assert_eq!(result(spec.clone(), Outcome::Warn, Some(500)).tally(), Tally::Failed);
        assert_eq!(result(spec, Outcome::Warn, Some(503)).tally(), Tally::Failed);
    }

    #[test]
    fn test_cors_warn_is_uncounted() {
        let mut spec = CheckSpec::new(Method::Options, "/api/blockchain/stats", "Check CORS headers");
        spec.probe = Probe::Cors;
        assert_eq!(result(spec, Outcome::Warn, Some(200)).tally(), Tally::Uncounted);
    }

    #[test]
    fn test_advisory_failure_is_uncounted() {
        let mut spec = CheckSpec::new(Method::Get, "/", "Dashboard server");
        spec.role = Role::Advisory;
        spec.probe = Probe::Reachable;
        let r = result(spec, Outcome::Fail, None);
        assert_eq!(r.tally(), Tally::Uncounted);
        assert!(!r.is_fatal());
    }

    #[test]
    fn test_precondition_failure_is_fatal_and_counted() {
        let mut spec = CheckSpec::new(Method::Get, "/health", "API server");
        spec.role = Role::Precondition;
        let r = result(spec, Outcome::Fail, None);
        assert!(r.is_fatal());
        assert_eq!(r.tally(), Tally::Failed);
    }

    #[test]
    fn test_summary_counts_add_up() {
        let json = CheckSpec::new(Method::Get, "/api/stats", "API statistics");
        let mut cors = CheckSpec::new(Method::Options, "/api/blockchain/stats", "CORS");
        cors.probe = Probe::Cors;

        let results = vec![
            result(json.clone(), Outcome::Pass, Some(200)),
            result(json.clone(), Outcome::Fail, None),
            result(json.clone(), Outcome::Warn, Some(200)),
            result(json, Outcome::Warn, Some(502)),
            result(cors, Outcome::Warn, Some(204)),
        ];

        let mut summary = RunSummary::default();
        for r in &results {
            summary.record(r);
        }
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.warnings, 1);
        assert_eq!(summary.passed + summary.failed, results.len() - summary.warnings);
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn test_empty_summary_succeeds() {
        assert_eq!(RunSummary::default().exit_code(), 0);
    }

    #[test]
    fn test_missing_fields_message() {
        let f = CheckFailure::MissingFields(vec!["difficulty".into(), "total_blocks".into()]);
        assert_eq!(f.to_string(), "missing fields: [difficulty, total_blocks]");
    }
}
