//! Blocking HTTP client for the Process Manager REST API.
//!
//! Every call returns a distinguishable [`ProcwatchError`] for network,
//! timeout, status, and body failures. Callers decide whether to report and
//! carry on with an empty result or to give up.

use std::time::Duration;

use log::debug;
use regex::Regex;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Config;
use crate::error::{ProcwatchError, Result};
use crate::record::{records_from_body, HealthStatus, RawRecord, SystemInfo};

pub const PROCESSES_PATH: &str = "/processes";
pub const SYSTEM_PATH: &str = "/system";
pub const HEALTH_PATH: &str = "/health";

/// Server-side filtering and ordering for `GET /processes`.
///
/// Unset fields are not sent, so the default query asks for the full
/// snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessQuery {
    pub sort_by: Option<String>,
    pub ascending: Option<bool>,
    pub user: Option<String>,
    /// Regular expression matched against process names by the server.
    pub name: Option<String>,
    pub limit: Option<usize>,
}

impl ProcessQuery {
    pub fn is_empty(&self) -> bool {
        *self == ProcessQuery::default()
    }

    /// Reject a name pattern the server would silently ignore.
    pub fn validate(&self) -> Result<()> {
        if let Some(pattern) = &self.name {
            Regex::new(pattern).map_err(|e| {
                ProcwatchError::Config(format!("Invalid name pattern '{}': {}", pattern, e))
            })?;
        }
        Ok(())
    }

    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(sort_by) = &self.sort_by {
            pairs.push(("sort_by", sort_by.clone()));
        }
        if let Some(ascending) = self.ascending {
            pairs.push(("ascending", ascending.to_string()));
        }
        if let Some(user) = &self.user {
            pairs.push(("user", user.clone()));
        }
        if let Some(name) = &self.name {
            pairs.push(("name", name.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

/// Where the monitor loop gets its data from.
pub trait ProcessSource {
    /// Fetch the full process snapshot.
    fn snapshot(&self) -> Result<Vec<RawRecord>>;

    /// Fetch host-wide information.
    fn system_info(&self) -> Result<SystemInfo>;
}

/// Client bound to one API base URL.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for `base_url`. `timeout` of `None` keeps the HTTP
    /// library's default.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            "procwatch/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|source| ProcwatchError::Http {
            url: base_url.to_string(),
            source,
        })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = match config.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        Self::new(&config.base_url, timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join the base URL and `path` with exactly one slash.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET `path` and decode the body as JSON.
    pub fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = self.url(path);
        debug!("GET {} {:?}", url, query);

        let mut request = self.client.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request
            .send()
            .map_err(|source| transport_error(&url, source))?;

        let status = response.status();
        if !status.is_success() {
            debug!("GET {} returned {}", url, status);
            return Err(ProcwatchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .map_err(|source| transport_error(&url, source))?;

        serde_json::from_str(&body).map_err(|e| {
            debug!("GET {} returned a body that is not JSON: {}", url, e);
            ProcwatchError::MalformedBody {
                url,
                reason: e.to_string(),
            }
        })
    }

    fn get_typed<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let value = self.get_json(path, &[])?;
        serde_json::from_value(value).map_err(|e| ProcwatchError::MalformedBody {
            url: self.url(path),
            reason: e.to_string(),
        })
    }

    /// `GET /processes`, optionally filtered by the server.
    pub fn fetch_processes(&self, query: &ProcessQuery) -> Result<Vec<RawRecord>> {
        let body = self.get_json(PROCESSES_PATH, &query.to_pairs())?;
        let records = records_from_body(body).map_err(|reason| ProcwatchError::MalformedBody {
            url: self.url(PROCESSES_PATH),
            reason,
        })?;
        debug!("Received {} process records", records.len());
        Ok(records)
    }

    /// `GET /system`.
    pub fn fetch_system_info(&self) -> Result<SystemInfo> {
        self.get_typed(SYSTEM_PATH)
    }

    /// `GET /health`.
    pub fn health(&self) -> Result<HealthStatus> {
        self.get_typed(HEALTH_PATH)
    }
}

impl ProcessSource for ApiClient {
    fn snapshot(&self) -> Result<Vec<RawRecord>> {
        self.fetch_processes(&ProcessQuery::default())
    }

    fn system_info(&self) -> Result<SystemInfo> {
        self.fetch_system_info()
    }
}

fn transport_error(url: &str, source: reqwest::Error) -> ProcwatchError {
    debug!("GET {} failed: {}", url, source);
    if source.is_timeout() {
        ProcwatchError::Timeout {
            url: url.to_string(),
        }
    } else {
        ProcwatchError::Http {
            url: url.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{serve, serve_stalled, unused_local_url};

    fn client_for(base_url: &str) -> ApiClient {
        ApiClient::new(base_url, Some(Duration::from_secs(5))).unwrap()
    }

    #[test]
    fn test_url_joins_with_single_slash() {
        let client = client_for("http://localhost:8080/api/");
        assert_eq!(client.base_url(), "http://localhost:8080/api");
        assert_eq!(client.url("/processes"), "http://localhost:8080/api/processes");
        assert_eq!(client.url("system"), "http://localhost:8080/api/system");
    }

    #[test]
    fn test_empty_query_has_no_pairs() {
        let query = ProcessQuery::default();
        assert!(query.is_empty());
        assert!(query.to_pairs().is_empty());
    }

    #[test]
    fn test_query_pairs_in_fixed_order() {
        let query = ProcessQuery {
            sort_by: Some("memory".to_string()),
            ascending: Some(true),
            user: Some("root".to_string()),
            name: Some("^nginx".to_string()),
            limit: Some(20),
        };
        assert_eq!(
            query.to_pairs(),
            vec![
                ("sort_by", "memory".to_string()),
                ("ascending", "true".to_string()),
                ("user", "root".to_string()),
                ("name", "^nginx".to_string()),
                ("limit", "20".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_validate_rejects_bad_regex() {
        let query = ProcessQuery {
            name: Some("([".to_string()),
            ..Default::default()
        };
        assert!(matches!(query.validate(), Err(ProcwatchError::Config(_))));
        assert!(ProcessQuery::default().validate().is_ok());
    }

    #[test]
    fn test_fetch_processes_decodes_array() {
        let server = serve(vec![(
            200,
            r#"[{"pid":1,"name":"init","cpu_usage":0.5},{"pid":2,"name":"kthreadd"}]"#.to_string(),
        )]);
        let client = client_for(&server.base_url);

        let records = client.fetch_processes(&ProcessQuery::default()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["name"], "init");
        let requests = server.finish();
        assert_eq!(requests, vec!["GET /api/processes HTTP/1.1".to_string()]);
    }

    #[test]
    fn test_fetch_processes_sends_query_string() {
        let server = serve(vec![(200, "[]".to_string())]);
        let client = client_for(&server.base_url);
        let query = ProcessQuery {
            user: Some("www-data".to_string()),
            limit: Some(3),
            ..Default::default()
        };

        let records = client.fetch_processes(&query).unwrap();

        assert!(records.is_empty());
        let requests = server.finish();
        assert_eq!(
            requests,
            vec!["GET /api/processes?user=www-data&limit=3 HTTP/1.1".to_string()]
        );
    }

    #[test]
    fn test_fetch_processes_decodes_envelope() {
        let server = serve(vec![(
            200,
            r#"{"processes":[{"pid":5}],"total":10,"filtered":1}"#.to_string(),
        )]);
        let client = client_for(&server.base_url);

        let records = client.snapshot().unwrap();

        assert_eq!(records.len(), 1);
        server.finish();
    }

    #[test]
    fn test_non_success_status_is_reported() {
        let server = serve(vec![(500, r#"{"error":"boom"}"#.to_string())]);
        let client = client_for(&server.base_url);

        let err = client.snapshot().unwrap_err();

        assert!(matches!(err, ProcwatchError::Status { status: 500, .. }));
        server.finish();
    }

    #[test]
    fn test_malformed_json_is_reported() {
        let server = serve(vec![(200, "<html>not json</html>".to_string())]);
        let client = client_for(&server.base_url);

        let err = client.snapshot().unwrap_err();

        assert!(matches!(err, ProcwatchError::MalformedBody { .. }));
        server.finish();
    }

    #[test]
    fn test_wrong_json_shape_is_reported() {
        let server = serve(vec![(200, r#"{"status":"ok"}"#.to_string())]);
        let client = client_for(&server.base_url);

        let err = client.snapshot().unwrap_err();

        assert!(matches!(err, ProcwatchError::MalformedBody { .. }));
        server.finish();
    }

    #[test]
    fn test_connection_refused_is_http_error() {
        let client = client_for(&unused_local_url());

        let err = client.snapshot().unwrap_err();

        assert!(matches!(err, ProcwatchError::Http { .. }));
        assert!(err.is_fetch_error());
    }

    #[test]
    fn test_slow_server_times_out() {
        let server = serve_stalled(Duration::from_secs(3));
        let client = ApiClient::new(&server.base_url, Some(Duration::from_millis(300))).unwrap();

        let err = client.snapshot().unwrap_err();

        assert!(matches!(err, ProcwatchError::Timeout { .. }));
    }

    #[test]
    fn test_fetch_system_info() {
        let server = serve(vec![(
            200,
            r#"{"cpu_count":4,"total_memory":8000,"used_memory":2000,"total_swap":0,"used_swap":0,"uptime":60,"load_average":{"one":1.0,"five":0.5,"fifteen":0.25}}"#.to_string(),
        )]);
        let client = client_for(&server.base_url);

        let info = client.fetch_system_info().unwrap();

        assert_eq!(info.cpu_count, 4);
        assert_eq!(info.load_average.one, 1.0);
        assert_eq!(server.finish(), vec!["GET /api/system HTTP/1.1".to_string()]);
    }

    #[test]
    fn test_health() {
        let server = serve(vec![(
            200,
            r#"{"status":"healthy","timestamp":"2026-10-18T10:00:00Z"}"#.to_string(),
        )]);
        let client = client_for(&server.base_url);

        let health = client.health().unwrap();

        assert_eq!(health.status, "healthy");
        server.finish();
    }
}
