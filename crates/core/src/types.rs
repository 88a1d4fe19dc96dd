/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// A schema-less JSON document as returned by a remote store, before
/// sanitization and typed decoding.
pub type RawDocument = serde_json::Value;
