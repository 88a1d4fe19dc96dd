//! Typed decoding of configuration documents from the configuration store.
//!
//! The store is schema-less and has accumulated several document shapes over
//! time. Every accepted variant is spelled out here; anything else fails to
//! decode instead of being read field-by-field downstream. Documents must be
//! sanitized (see [`crate::sanitize`]) before decoding.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::sanitize::canonical_id;
use crate::types::Timestamp;

/// A game configuration as owned by the remote configuration store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Configuration {
    #[serde(rename = "_id", alias = "id", deserialize_with = "deserialize_id")]
    pub id: String,
    pub game: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parameters: Map<String, Value>,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
    #[serde(alias = "owner_id", deserialize_with = "deserialize_id")]
    pub user_id: String,
    #[serde(default = "unix_epoch", deserialize_with = "deserialize_timestamp")]
    pub created_at: Timestamp,
    #[serde(default, alias = "view_count", deserialize_with = "null_as_default")]
    pub views: i64,
}

impl Configuration {
    /// Decode a sanitized document.
    pub fn from_document(document: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(document)
    }

    /// Whether any of `wanted` matches one of this configuration's tags,
    /// ignoring case and surrounding whitespace.
    pub fn has_any_tag(&self, wanted: &[String]) -> bool {
        let own: Vec<String> = self.tags.iter().map(|t| t.trim().to_lowercase()).collect();
        wanted
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .any(|t| own.contains(&t))
    }

    /// Whether the title contains `needle`, ignoring case.
    pub fn title_contains(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(&needle.to_lowercase())
    }
}

fn unix_epoch() -> Timestamp {
    Timestamp::default()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    canonical_id(&value)
        .ok_or_else(|| de::Error::custom(format!("unsupported identifier: {value}")))
}

/// Tags arrive either as a list or, in older documents, as one
/// comma-separated string.
#[derive(Deserialize)]
#[serde(untagged)]
enum TagsRepr {
    List(Vec<String>),
    Csv(String),
}

fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = match Option::<TagsRepr>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(TagsRepr::List(tags)) => tags,
        Some(TagsRepr::Csv(csv)) => csv
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
    };
    Ok(tags)
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Timestamp, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    timestamp_from_value(&value)
        .ok_or_else(|| de::Error::custom(format!("unsupported timestamp: {value}")))
}

fn timestamp_from_value(value: &Value) -> Option<Timestamp> {
    match value {
        Value::Null => Some(unix_epoch()),
        Value::String(s) => parse_timestamp(s),
        Value::Object(map) if map.len() == 1 => match map.get("$date")? {
            Value::String(s) => parse_timestamp(s),
            Value::Number(n) => DateTime::from_timestamp_millis(n.as_i64()?),
            Value::Object(inner) => {
                // Canonical extended JSON: {"$date": {"$numberLong": "1700000000000"}}
                let millis = inner.get("$numberLong")?.as_str()?.parse().ok()?;
                DateTime::from_timestamp_millis(millis)
            }
            _ => None,
        },
        _ => None,
    }
}

/// Parse RFC 3339, or a naive ISO-8601 timestamp interpreted as UTC.
pub fn parse_timestamp(s: &str) -> Option<Timestamp> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}
