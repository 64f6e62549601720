/// Notes and notebooks are keyed by random UUIDs (v4).
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Tenant key. Opaque string supplied by the identity layer.
pub type UserId = String;

/// Generate a fresh, globally unique entity id.
pub fn new_id() -> DbId {
    uuid::Uuid::new_v4()
}
