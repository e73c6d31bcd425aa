/// Record identifiers are opaque strings generated by the store.
///
/// Integer keys returned by some backends are rendered to their decimal form.
pub type RecordId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates (payment date, birth date, exam date) carry no time zone.
pub type Date = chrono::NaiveDate;
