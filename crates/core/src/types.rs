/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Question ids double as the keys of a submission's `responses` object.
pub type QuestionId = DbId;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
