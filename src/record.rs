//! Process Manager API payloads.
//!
//! Records arrive as loosely-typed JSON objects. The exporter keeps them raw so
//! missing fields become empty cells; the monitor decodes them into
//! [`ProcessRecord`], where every field has a default.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A process record exactly as received from the API.
pub type RawRecord = Map<String, Value>;

/// One observed operating-system process.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessRecord {
    pub pid: u32,
    pub ppid: u32,
    pub name: String,
    pub user: String,
    /// CPU usage in percent; can exceed 100 on multi-core hosts.
    pub cpu_usage: f64,
    /// Resident memory in KB.
    pub memory_usage: u64,
    pub memory_percent: f64,
    /// Older servers send this as `state`.
    pub status: String,
    pub threads: u32,
    pub network_connections: Option<u64>,
    pub is_container: bool,
    pub container_id: Option<String>,
    pub gpu_memory: Option<u64>,
    pub command: String,
}

impl ProcessRecord {
    /// Build a record for the CPU check.
    ///
    /// Only `cpu_usage` must be a number; `None` is returned when it is missing
    /// or has another type. Any other field that is null or of an unexpected
    /// type takes its default value. Whole-number floats such as `2048.0` are
    /// accepted for integer fields.
    pub fn from_raw(raw: &RawRecord) -> Option<Self> {
        let Some(cpu_usage) = raw.get("cpu_usage").and_then(Value::as_f64) else {
            log::warn!(
                "Skipping process record without a numeric cpu_usage (pid {})",
                raw.get("pid").map(Value::to_string).unwrap_or_default()
            );
            return None;
        };

        let status = match text(raw, "status") {
            Some(status) => Some(status),
            None => text(raw, "state"),
        };

        Some(Self {
            pid: count(raw, "pid").and_then(|n| u32::try_from(n).ok()).unwrap_or_default(),
            ppid: count(raw, "ppid").and_then(|n| u32::try_from(n).ok()).unwrap_or_default(),
            name: text(raw, "name").unwrap_or_default(),
            user: text(raw, "user").unwrap_or_default(),
            cpu_usage,
            memory_usage: count(raw, "memory_usage").unwrap_or_default(),
            memory_percent: raw.get("memory_percent").and_then(Value::as_f64).unwrap_or_default(),
            status: status.unwrap_or_default(),
            threads: count(raw, "threads").and_then(|n| u32::try_from(n).ok()).unwrap_or_default(),
            network_connections: count(raw, "network_connections"),
            is_container: raw.get("is_container").and_then(Value::as_bool).unwrap_or_default(),
            container_id: text(raw, "container_id"),
            gpu_memory: count(raw, "gpu_memory"),
            command: text(raw, "command").unwrap_or_default(),
        })
    }
}

fn text(raw: &RawRecord, key: &str) -> Option<String> {
    raw.get(key).and_then(Value::as_str).map(str::to_string)
}

/// A non-negative whole number, whether sent as an integer or as a float.
fn count(raw: &RawRecord, key: &str) -> Option<u64> {
    let value = raw.get(key)?;
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    })
}

/// Build every record that has a numeric `cpu_usage`, preserving input order.
pub fn decode_records(raw: &[RawRecord]) -> Vec<ProcessRecord> {
    raw.iter().filter_map(ProcessRecord::from_raw).collect()
}

/// Extract the list of raw records from a `/processes` response body.
///
/// Accepts a bare array or the `{"processes": [...], "total": n}` envelope.
/// Returns a description of the problem for any other shape.
pub fn records_from_body(body: Value) -> std::result::Result<Vec<RawRecord>, String> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut envelope) => match envelope.remove("processes") {
            Some(Value::Array(items)) => items,
            Some(_) => return Err("\"processes\" is not an array".to_string()),
            None => return Err("expected an array of processes".to_string()),
        },
        other => {
            return Err(format!(
                "expected an array of processes, got {}",
                json_kind(&other)
            ))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(format!(
                "process entry {} is {}, not an object",
                index,
                json_kind(&other)
            )),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Host-wide figures returned by `GET /system`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemInfo {
    pub cpu_count: usize,
    /// Bytes.
    pub total_memory: u64,
    pub used_memory: u64,
    pub total_swap: u64,
    pub used_swap: u64,
    /// Seconds since boot.
    pub uptime: u64,
    pub load_average: LoadAverage,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

impl SystemInfo {
    pub fn memory_percent(&self) -> f64 {
        percent(self.used_memory, self.total_memory)
    }

    pub fn swap_percent(&self) -> f64 {
        percent(self.used_swap, self.total_swap)
    }
}

fn percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        used as f64 / total as f64 * 100.0
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}
