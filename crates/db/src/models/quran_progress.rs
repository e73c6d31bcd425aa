//! Quran recitation / memorisation progress model and DTOs.

use madrasa_core::session::Session;
use madrasa_core::types::{Date, RecordId, Timestamp};
use madrasa_core::validation::{first_error, validate_ayah_range, validate_required};
use serde::{Deserialize, Serialize};

use crate::mapper::{self, Row, RowBuilder};
use crate::record::{NewRecord, Record, RecordPatch};
use crate::schema::Table;

/// A row from the `quran_progress` table with the student's name joined in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuranProgress {
    pub id: RecordId,
    pub student_id: RecordId,
    pub student_name: String,
    pub date: Option<Date>,
    pub surah: String,
    pub from_ayah: i64,
    pub to_ayah: i64,
    /// Juz number (1-30), when recorded.
    pub para: Option<i64>,
    pub rating: Option<String>,
    pub remarks: Option<String>,
    pub recorded_by: String,
    pub created_at: Option<Timestamp>,
}

impl Record for QuranProgress {
    const TABLE: Table = Table::QuranProgress;
    type New = NewQuranProgress;
    type Patch = QuranProgressPatch;

    fn from_row(row: &Row) -> Self {
        Self {
            id: mapper::text(row, "id"),
            student_id: mapper::text(row, "student_id"),
            student_name: mapper::joined_text(row, "students", "name"),
            date: mapper::date(row, "date"),
            surah: mapper::text(row, "surah"),
            from_ayah: mapper::integer(row, "from_ayah"),
            to_ayah: mapper::integer(row, "to_ayah"),
            para: mapper::opt_integer(row, "para"),
            rating: mapper::opt_text(row, "rating"),
            remarks: mapper::opt_text(row, "remarks"),
            recorded_by: mapper::text(row, "recorded_by"),
            created_at: mapper::timestamp(row, "created_at"),
        }
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .set_text("id", &self.id)
            .set("student_id", self.student_id.as_str())
            .set_date("date", self.date)
            .set("surah", self.surah.as_str())
            .set("from_ayah", self.from_ayah)
            .set("to_ayah", self.to_ayah)
            .set_opt("para", self.para)
            .set_opt("rating", self.rating.clone())
            .set_opt("remarks", self.remarks.clone())
            .set("recorded_by", self.recorded_by.as_str())
            .set_timestamp("created_at", self.created_at)
            .build()
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// DTO for logging a lesson. `recorded_by` comes from the session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuranProgress {
    pub student_id: RecordId,
    pub date: Date,
    pub surah: String,
    pub from_ayah: i64,
    pub to_ayah: i64,
    pub para: Option<i64>,
    pub rating: Option<String>,
    pub remarks: Option<String>,
}

fn validate_para(para: i64) -> Result<(), String> {
    if (1..=30).contains(&para) {
        Ok(())
    } else {
        Err("Para must be between 1 and 30".to_string())
    }
}

impl NewRecord for NewQuranProgress {
    fn validate(&self) -> Result<(), String> {
        first_error([
            validate_required("Student", &self.student_id),
            validate_required("Surah", &self.surah),
            validate_ayah_range(self.from_ayah, self.to_ayah),
            self.para.map_or(Ok(()), validate_para),
        ])
    }

    fn to_row(&self, session: &Session) -> Row {
        RowBuilder::new()
            .set("student_id", self.student_id.as_str())
            .set_date("date", Some(self.date))
            .set("surah", self.surah.trim())
            .set("from_ayah", self.from_ayah)
            .set("to_ayah", self.to_ayah)
            .set_opt("para", self.para)
            .set_opt("rating", self.rating.clone())
            .set_opt("remarks", self.remarks.clone())
            .set("recorded_by", session.actor())
            .build()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuranProgressPatch {
    pub date: Option<Date>,
    pub surah: Option<String>,
    pub from_ayah: Option<i64>,
    pub to_ayah: Option<i64>,
    pub para: Option<i64>,
    pub rating: Option<String>,
    pub remarks: Option<String>,
}

impl RecordPatch for QuranProgressPatch {
    fn validate(&self) -> Result<(), String> {
        let range = match (self.from_ayah, self.to_ayah) {
            (Some(from), Some(to)) => validate_ayah_range(from, to),
            // One bound alone is checked against the store's row by its constraint.
            _ => Ok(()),
        };
        first_error([
            self.surah
                .as_deref()
                .map_or(Ok(()), |s| validate_required("Surah", s)),
            range,
            self.para.map_or(Ok(()), validate_para),
        ])
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .set_date("date", self.date)
            .set_opt("surah", self.surah.clone())
            .set_opt("from_ayah", self.from_ayah)
            .set_opt("to_ayah", self.to_ayah)
            .set_opt("para", self.para)
            .set_opt("rating", self.rating.clone())
            .set_opt("remarks", self.remarks.clone())
            .build()
    }
}
