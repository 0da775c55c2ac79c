/// Provider-assigned droplet identifiers are unsigned 64-bit integers.
pub type DropletId = u64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
