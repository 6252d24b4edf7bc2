/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Congress edition used when a request does not name a year.
pub const CURRENT_CONGRESS_YEAR: i32 = 2026;
