//! Row access helpers shared by every entity mapping.
//!
//! Read helpers never fail: a missing or null optional column yields an
//! empty string, zero or `None`. Stores disagree on numeric and key shapes
//! (numbers as strings, integer ids, joins as one-element arrays), so the
//! readers accept all of them.
//!
//! [`RowBuilder`] is the write direction. It only emits the columns it is
//! given, which is what keeps partial updates from clobbering other columns.

use chrono::{NaiveDate, SecondsFormat, Utc};
use madrasa_core::types::{Date, Timestamp};
use serde_json::Value;

/// A single store record: column name to JSON value.
pub type Row = serde_json::Map<String, Value>;

// ---------------------------------------------------------------------------
// Read direction
// ---------------------------------------------------------------------------

fn present<'a>(row: &'a Row, column: &str) -> Option<&'a Value> {
    row.get(column).filter(|v| !v.is_null())
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Text column; missing or null reads as `""`.
pub fn text(row: &Row, column: &str) -> String {
    opt_text(row, column).unwrap_or_default()
}

/// Text column; missing or null reads as `None`.
pub fn opt_text(row: &Row, column: &str) -> Option<String> {
    present(row, column).and_then(value_to_string)
}

/// Numeric column; missing, null or unparsable reads as `0.0`.
pub fn number(row: &Row, column: &str) -> f64 {
    opt_number(row, column).unwrap_or(0.0)
}

pub fn opt_number(row: &Row, column: &str) -> Option<f64> {
    match present(row, column)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Integer column; missing reads as `0`. Fractional values are truncated.
pub fn integer(row: &Row, column: &str) -> i64 {
    opt_integer(row, column).unwrap_or(0)
}

pub fn opt_integer(row: &Row, column: &str) -> Option<i64> {
    match present(row, column)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Boolean flag with a caller-supplied default for missing columns.
pub fn flag(row: &Row, column: &str, default: bool) -> bool {
    match present(row, column) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(s.as_str(), "true" | "t" | "1"),
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        _ => default,
    }
}

/// Calendar date column. Accepts `YYYY-MM-DD` or a full timestamp.
pub fn date(row: &Row, column: &str) -> Option<Date> {
    let raw = opt_text(row, column)?;
    let day = raw.get(..10).unwrap_or(raw.as_str());
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Timestamp column in RFC 3339.
pub fn timestamp(row: &Row, column: &str) -> Option<Timestamp> {
    let raw = opt_text(row, column)?;
    chrono::DateTime::parse_from_rfc3339(&raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// A column of a joined relation, e.g. `joined_text(row, "students", "name")`.
///
/// The relation may be embedded as an object or as a one-element array;
/// a missing relation reads as `""`.
pub fn joined_text(row: &Row, relation: &str, column: &str) -> String {
    let related = match present(row, relation) {
        Some(Value::Object(obj)) => Some(obj),
        Some(Value::Array(items)) => items.first().and_then(Value::as_object),
        _ => None,
    };
    related.map(|obj| text(obj, column)).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Write direction
// ---------------------------------------------------------------------------

/// Render a timestamp the way the store echoes it back.
pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Largest magnitude an `f64` holds with every integer exactly representable.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// JSON for a numeric column. Whole values are written as integers so a
/// column the store returned as `100` goes back as `100`, not `100.0`.
pub fn number_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}

/// Builds the column map sent on insert and update.
#[derive(Debug, Default)]
pub struct RowBuilder {
    row: Row,
}

impl RowBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.row.insert(column.to_string(), value.into());
        self
    }

    /// Set the column only when a value was provided.
    pub fn set_opt<T: Into<Value>>(self, column: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    pub fn set_number(self, column: &str, value: f64) -> Self {
        self.set(column, number_value(value))
    }

    pub fn set_opt_number(self, column: &str, value: Option<f64>) -> Self {
        self.set_opt(column, value.map(number_value))
    }

    /// Text where empty means "none yet", such as the id of an unsaved record.
    /// Optional text columns use [`set_opt`](Self::set_opt) so that a stored
    /// `""` is written back.
    pub fn set_text(self, column: &str, value: &str) -> Self {
        if value.is_empty() {
            self
        } else {
            self.set(column, value)
        }
    }

    pub fn set_date(self, column: &str, value: Option<Date>) -> Self {
        self.set_opt(column, value.map(|d| d.format("%Y-%m-%d").to_string()))
    }

    pub fn set_timestamp(self, column: &str, value: Option<Timestamp>) -> Self {
        self.set_opt(column, value.as_ref().map(format_timestamp))
    }

    pub fn build(self) -> Row {
        self.row
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn missing_text_defaults_to_empty() {
        let r = row(json!({"name": "Ali", "guardian_phone": null}));
        assert_eq!(text(&r, "name"), "Ali");
        assert_eq!(text(&r, "guardian_phone"), "");
        assert_eq!(text(&r, "address"), "");
        assert_eq!(opt_text(&r, "guardian_phone"), None);
    }

    #[test]
    fn integer_ids_render_as_strings() {
        let r = row(json!({"id": 17}));
        assert_eq!(text(&r, "id"), "17");
    }

    #[test]
    fn numbers_accept_numeric_strings() {
        let r = row(json!({"amount": "1250.50", "fee": 500, "bad": "n/a"}));
        assert_eq!(number(&r, "amount"), 1250.5);
        assert_eq!(number(&r, "fee"), 500.0);
        assert_eq!(number(&r, "bad"), 0.0);
        assert_eq!(opt_number(&r, "missing"), None);
    }

    #[test]
    fn integers_truncate_fractions() {
        let r = row(json!({"a": 7, "b": 7.9, "c": "12"}));
        assert_eq!(integer(&r, "a"), 7);
        assert_eq!(integer(&r, "b"), 7);
        assert_eq!(integer(&r, "c"), 12);
    }

    #[test]
    fn flag_uses_default_when_missing() {
        let r = row(json!({"active": false, "legacy": "t"}));
        assert!(!flag(&r, "active", true));
        assert!(flag(&r, "legacy", false));
        assert!(flag(&r, "missing", true));
    }

    #[test]
    fn date_accepts_timestamp_prefix() {
        let r = row(json!({"d1": "2024-03-15", "d2": "2024-03-15T08:00:00+00:00", "d3": "soon"}));
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15);
        assert_eq!(date(&r, "d1"), expected);
        assert_eq!(date(&r, "d2"), expected);
        assert_eq!(date(&r, "d3"), None);
    }

    #[test]
    fn timestamp_round_trips_through_format() {
        let r = row(json!({"created_at": "2024-03-15T08:30:00+00:00"}));
        let ts = timestamp(&r, "created_at").unwrap();
        assert_eq!(format_timestamp(&ts), "2024-03-15T08:30:00+00:00");
    }

    #[test]
    fn joined_text_handles_object_and_array() {
        let obj = row(json!({"students": {"name": "Ali"}}));
        let arr = row(json!({"students": [{"name": "Omar"}]}));
        let none = row(json!({"students": null}));
        assert_eq!(joined_text(&obj, "students", "name"), "Ali");
        assert_eq!(joined_text(&arr, "students", "name"), "Omar");
        assert_eq!(joined_text(&none, "students", "name"), "");
    }

    #[test]
    fn whole_numbers_are_written_as_integers() {
        assert_eq!(number_value(100.0), json!(100));
        assert_eq!(number_value(-3.0), json!(-3));
        assert_eq!(number_value(1250.5), json!(1250.5));
        assert_eq!(number_value(f64::NAN), Value::Null);

        let r = row(json!({"total_marks": 100, "amount": 99.75}));
        let back = RowBuilder::new()
            .set_number("total_marks", number(&r, "total_marks"))
            .set_number("amount", number(&r, "amount"))
            .build();
        assert_eq!(back, r);
    }

    #[test]
    fn builder_skips_unprovided_columns() {
        let built = RowBuilder::new()
            .set("name", "Ali")
            .set_opt::<f64>("monthly_fee", None)
            .set_text("id", "")
            .set_date("birth_date", NaiveDate::from_ymd_opt(2015, 1, 2))
            .build();
        assert_eq!(built.len(), 2);
        assert_eq!(built["name"], "Ali");
        assert_eq!(built["birth_date"], "2015-01-02");
    }
}
