/// Job identifiers are caller-visible UUIDs, generated at ingestion and
/// never reused.
pub type JobId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
