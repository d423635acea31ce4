/// All primary keys are PostgreSQL UUIDs generated by `gen_random_uuid()`.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Parse a string as a well-formed identity.
///
/// Returns `None` for anything that is not a UUID, which callers treat as
/// "this value must be a name" or as a soft miss.
pub fn parse_id(value: &str) -> Option<DbId> {
    DbId::parse_str(value.trim()).ok()
}
