//! Exam entity model and DTOs.

use madrasa_core::session::Session;
use madrasa_core::types::{Date, RecordId, Timestamp};
use madrasa_core::validation::{first_error, validate_amount, validate_required};
use serde::{Deserialize, Serialize};

use crate::mapper::{self, Row, RowBuilder};
use crate::record::{NewRecord, Record, RecordPatch};
use crate::schema::Table;

/// A row from the `exams` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: RecordId,
    pub title: String,
    pub group_name: String,
    pub exam_date: Option<Date>,
    pub total_marks: f64,
    pub created_at: Option<Timestamp>,
}

impl Record for Exam {
    const TABLE: Table = Table::Exams;
    type New = NewExam;
    type Patch = ExamPatch;

    fn from_row(row: &Row) -> Self {
        Self {
            id: mapper::text(row, "id"),
            title: mapper::text(row, "title"),
            group_name: mapper::text(row, "group_name"),
            exam_date: mapper::date(row, "exam_date"),
            total_marks: mapper::number(row, "total_marks"),
            created_at: mapper::timestamp(row, "created_at"),
        }
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .set_text("id", &self.id)
            .set("title", self.title.as_str())
            .set("group_name", self.group_name.as_str())
            .set_date("exam_date", self.exam_date)
            .set_number("total_marks", self.total_marks)
            .set_timestamp("created_at", self.created_at)
            .build()
    }

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExam {
    pub title: String,
    pub group_name: String,
    pub exam_date: Date,
    pub total_marks: f64,
}

impl NewRecord for NewExam {
    fn validate(&self) -> Result<(), String> {
        first_error([
            validate_required("Title", &self.title),
            validate_required("Group", &self.group_name),
            validate_amount("Total marks", self.total_marks),
        ])
    }

    fn to_row(&self, _session: &Session) -> Row {
        RowBuilder::new()
            .set("title", self.title.trim())
            .set("group_name", self.group_name.as_str())
            .set_date("exam_date", Some(self.exam_date))
            .set_number("total_marks", self.total_marks)
            .build()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamPatch {
    pub title: Option<String>,
    pub group_name: Option<String>,
    pub exam_date: Option<Date>,
    pub total_marks: Option<f64>,
}

impl RecordPatch for ExamPatch {
    fn validate(&self) -> Result<(), String> {
        first_error([
            self.title
                .as_deref()
                .map_or(Ok(()), |t| validate_required("Title", t)),
            self.total_marks
                .map_or(Ok(()), |m| validate_amount("Total marks", m)),
        ])
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .set_opt("title", self.title.clone())
            .set_opt("group_name", self.group_name.clone())
            .set_date("exam_date", self.exam_date)
            .set_opt_number("total_marks", self.total_marks)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::fixtures;
    use serde_json::json;

    #[test]
    fn row_round_trip_keeps_integer_total_marks() {
        let row = fixtures::row(json!({
            "id": "e-1",
            "title": "Half-yearly",
            "group_name": "nazera",
            "exam_date": "2024-06-10",
            "total_marks": 100,
            "created_at": "2024-05-20T09:00:00+00:00"
        }));

        let back = Exam::from_row(&row).to_row();
        assert_eq!(back["total_marks"], json!(100));
        assert_eq!(back, fixtures::persisted(Table::Exams, &row));
    }

    #[test]
    fn zero_total_marks_rejected() {
        let new = NewExam {
            title: "Final".into(),
            group_name: "hifz".into(),
            exam_date: Date::from_ymd_opt(2024, 12, 1).unwrap(),
            total_marks: 0.0,
        };
        assert!(new.validate().is_err());
    }
}
