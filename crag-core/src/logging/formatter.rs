//! Log line formats

use crate::logging::destinations::LogEntry;
use std::str::FromStr;

/// How log lines are rendered
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// `{"timestamp":"...","level":"INFO","target":"...","message":"..."}`
    Json,
    /// `2024-01-15 10:30:00.000 INFO  [crag_core::api] GET /climbs/ -> 200`
    Human,
    /// `timestamp=... level=INFO target=... message="..."`
    Logfmt,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "human" | "text" => Ok(LogFormat::Human),
            "logfmt" => Ok(LogFormat::Logfmt),
            other => Err(format!("unknown log format \"{}\"", other)),
        }
    }
}

impl LogFormat {
    pub fn format_entry(&self, entry: &LogEntry) -> String {
        match self {
            LogFormat::Json => format_json(entry),
            LogFormat::Human => format_human(entry),
            LogFormat::Logfmt => format_logfmt(entry),
        }
    }
}

fn level_str(entry: &LogEntry) -> String {
    format!("{:?}", entry.level).to_uppercase()
}

fn format_json(entry: &LogEntry) -> String {
    let mut json = serde_json::Map::new();

    json.insert("timestamp".into(), entry.timestamp.to_rfc3339().into());
    json.insert("level".into(), level_str(entry).into());
    json.insert("target".into(), entry.target.clone().into());
    json.insert("message".into(), entry.message.clone().into());

    if let Some((file, line)) = &entry.location {
        json.insert("file".into(), file.clone().into());
        json.insert("line".into(), (*line).into());
    }

    for (key, value) in &entry.fields {
        json.insert(key.clone(), value.clone());
    }

    serde_json::Value::Object(json).to_string()
}

fn format_human(entry: &LogEntry) -> String {
    let mut line = format!(
        "{} {:5} [{}] {}",
        entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
        level_str(entry),
        entry.target,
        entry.message
    );

    for (key, value) in &entry.fields {
        line.push_str(&format!(" {}={}", key, plain(value)));
    }

    line
}

fn format_logfmt(entry: &LogEntry) -> String {
    let mut parts = vec![
        format!("timestamp={}", entry.timestamp.to_rfc3339()),
        format!("level={}", level_str(entry)),
        format!("target={}", entry.target),
        format!("message=\"{}\"", entry.message.replace('"', "\\\"")),
    ];

    for (key, value) in &entry.fields {
        let rendered = match value {
            serde_json::Value::Number(_) | serde_json::Value::Bool(_) => plain(value),
            _ => format!("\"{}\"", plain(value).replace('"', "\\\"")),
        };
        parts.push(format!("{}={}", key, rendered));
    }

    parts.join(" ")
}

fn plain(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
