//! Exam result model and DTOs.

use madrasa_core::session::Session;
use madrasa_core::types::{RecordId, Timestamp};
use madrasa_core::validation::{first_error, validate_non_negative, validate_required};
use serde::{Deserialize, Serialize};

use crate::mapper::{self, Row, RowBuilder};
use crate::record::{NewRecord, Record, RecordPatch};
use crate::schema::Table;

/// A row from the `exam_results` table with the exam title and student name
/// joined in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamResult {
    pub id: RecordId,
    pub exam_id: RecordId,
    pub exam_title: String,
    pub student_id: RecordId,
    pub student_name: String,
    pub marks_obtained: f64,
    pub grade: Option<String>,
    pub remarks: Option<String>,
    pub created_at: Option<Timestamp>,
}

impl Record for ExamResult {
    const TABLE: Table = Table::ExamResults;
    type New = NewExamResult;
    type Patch = ExamResultPatch;

    fn from_row(row: &Row) -> Self {
        Self {
            id: mapper::text(row, "id"),
            exam_id: mapper::text(row, "exam_id"),
            exam_title: mapper::joined_text(row, "exams", "title"),
            student_id: mapper::text(row, "student_id"),
            student_name: mapper::joined_text(row, "students", "name"),
            marks_obtained: mapper::number(row, "marks_obtained"),
            grade: mapper::opt_text(row, "grade"),
            remarks: mapper::opt_text(row, "remarks"),
            created_at: mapper::timestamp(row, "created_at"),
        }
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .set_text("id", &self.id)
            .set("exam_id", self.exam_id.as_str())
            .set("student_id", self.student_id.as_str())
            .set_number("marks_obtained", self.marks_obtained)
            .set_opt("grade", self.grade.clone())
            .set_opt("remarks", self.remarks.clone())
            .set_timestamp("created_at", self.created_at)
            .build()
    }

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExamResult {
    pub exam_id: RecordId,
    pub student_id: RecordId,
    pub marks_obtained: f64,
    pub grade: Option<String>,
    pub remarks: Option<String>,
}

impl NewRecord for NewExamResult {
    fn validate(&self) -> Result<(), String> {
        first_error([
            validate_required("Exam", &self.exam_id),
            validate_required("Student", &self.student_id),
            validate_non_negative("Marks", self.marks_obtained),
        ])
    }

    fn to_row(&self, _session: &Session) -> Row {
        RowBuilder::new()
            .set("exam_id", self.exam_id.as_str())
            .set("student_id", self.student_id.as_str())
            .set_number("marks_obtained", self.marks_obtained)
            .set_opt("grade", self.grade.clone())
            .set_opt("remarks", self.remarks.clone())
            .build()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamResultPatch {
    pub marks_obtained: Option<f64>,
    pub grade: Option<String>,
    pub remarks: Option<String>,
}

impl RecordPatch for ExamResultPatch {
    fn validate(&self) -> Result<(), String> {
        self.marks_obtained
            .map_or(Ok(()), |m| validate_non_negative("Marks", m))
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .set_opt_number("marks_obtained", self.marks_obtained)
            .set_opt("grade", self.grade.clone())
            .set_opt("remarks", self.remarks.clone())
            .build()
    }
}
