//! Result persistence
//!
//! One human-readable record per unit:
//!
//! ```text
//! API RESPONSE:
//! { ...raw response, keys sorted, 4-space indent... }
//! MESSAGE CONTENT:
//! <extracted text, verbatim>
//! ```

use crate::error::SinkError;
use serde::Serialize;
use serde_json::{Map, Value};
use sift_domain::traits::ResultSink;
use sift_domain::{Outcome, UnitId};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Suffix appended to the unit name to form the record file name
pub const RESULT_SUFFIX: &str = ".results.txt";

/// Writes one record file per unit under `<results_dir>/<collection>/`
#[derive(Debug, Clone)]
pub struct FileResultSink {
    results_dir: PathBuf,
}

impl FileResultSink {
    /// Create a sink writing under `results_dir`
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        Self {
            results_dir: results_dir.into(),
        }
    }

    /// Where the record for `unit` is written
    pub fn record_path(&self, unit: &UnitId) -> PathBuf {
        let mut path = self.results_dir.clone();
        if !unit.collection.is_empty() {
            path.push(&unit.collection);
        }
        path.push(format!("{}{}", unit.name, RESULT_SUFFIX));
        path
    }
}

impl ResultSink for FileResultSink {
    type Error = SinkError;

    fn persist(&mut self, unit: &UnitId, outcome: &Outcome, text: &str) -> Result<(), SinkError> {
        let path = self.record_path(unit);
        let record = render_record(outcome.raw(), text)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }
        fs::write(&path, record).map_err(|e| io_error(&path, e))?;

        debug!("Wrote {}", path.display());
        Ok(())
    }
}

fn io_error(path: &Path, source: std::io::Error) -> SinkError {
    SinkError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Render the record text for a raw response and its message content
pub fn render_record(raw: &Value, text: &str) -> Result<String, SinkError> {
    let mut out = String::from("API RESPONSE:\n");
    out.push_str(&pretty_sorted(raw)?);
    out.push_str("\nMESSAGE CONTENT:\n");
    out.push_str(text);
    Ok(out)
}

/// Pretty-print with sorted keys, 4-space indent and non-ASCII kept as is
fn pretty_sorted(value: &Value) -> Result<String, SinkError> {
    let sorted = sort_keys(value);
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    sorted
        .serialize(&mut serializer)
        .map_err(|e| SinkError::Render(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| SinkError::Render(e.to_string()))
}

/// Rebuild objects with keys in sorted order, whatever map backs `Value`
fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), sort_keys(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}
