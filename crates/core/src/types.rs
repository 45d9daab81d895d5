/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar date of a punch event, as reported by the time clock.
pub type PunchDate = chrono::NaiveDate;

/// Time-of-day of a punch event, as reported by the time clock.
pub type PunchTime = chrono::NaiveTime;
