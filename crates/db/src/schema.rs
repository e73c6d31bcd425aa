//! The closed set of store tables and their row schemas.
//!
//! Every table the console touches is a [`Table`] variant; column lists,
//! required columns and one-level joins are fixed here at compile time so no
//! caller ever builds a table or column name from a runtime string.

use std::fmt;

/// A one-level foreign-key join resolved alongside the parent row.
///
/// The related row's `columns` come back nested under the relation's table
/// name, e.g. `{"student_id": "s-1", "students": {"name": "Ali"}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Embed {
    pub relation: Table,
    /// Column on the parent table holding the related row's `id`.
    pub foreign_key: &'static str,
    pub columns: &'static [&'static str],
}

/// Known tables in the hosted store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Students,
    Payments,
    Expenses,
    Teachers,
    Staff,
    Donations,
    Exams,
    ExamResults,
    QuranProgress,
    Notifications,
    Users,
}

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

const STUDENT_COLUMNS: &[&str] = &[
    "id",
    "name",
    "father_name",
    "mother_name",
    "whatsapp_number",
    "guardian_phone",
    "address",
    "group_name",
    "monthly_fee",
    "birth_date",
    "enrollment_number",
    "active",
    "created_at",
];
const STUDENT_REQUIRED: &[&str] = &[
    "name",
    "father_name",
    "mother_name",
    "whatsapp_number",
    "address",
    "group_name",
    "monthly_fee",
];

const PAYMENT_COLUMNS: &[&str] = &[
    "id",
    "student_id",
    "amount",
    "date",
    "type",
    "status",
    "accepted_by",
    "description",
    "verified_by",
    "created_at",
];
const PAYMENT_REQUIRED: &[&str] = &[
    "student_id",
    "amount",
    "date",
    "type",
    "status",
    "accepted_by",
];

const EXPENSE_COLUMNS: &[&str] = &[
    "id",
    "title",
    "amount",
    "category",
    "subcategory",
    "status",
    "created_by",
    "description",
    "verified_by",
    "date",
    "created_at",
];
const EXPENSE_REQUIRED: &[&str] = &[
    "title",
    "amount",
    "category",
    "subcategory",
    "status",
    "created_by",
];

const TEACHER_COLUMNS: &[&str] = &[
    "id",
    "name",
    "phone",
    "subject",
    "salary",
    "join_date",
    "active",
    "created_at",
];
const TEACHER_REQUIRED: &[&str] = &["name", "phone"];

const STAFF_COLUMNS: &[&str] = &[
    "id",
    "name",
    "role",
    "phone",
    "salary",
    "join_date",
    "active",
    "created_at",
];
const STAFF_REQUIRED: &[&str] = &["name", "role", "phone"];

const DONATION_COLUMNS: &[&str] = &[
    "id",
    "donor_name",
    "donor_phone",
    "amount",
    "date",
    "purpose",
    "accepted_by",
    "created_at",
];
const DONATION_REQUIRED: &[&str] = &["donor_name", "amount", "date", "accepted_by"];

const EXAM_COLUMNS: &[&str] = &[
    "id",
    "title",
    "group_name",
    "exam_date",
    "total_marks",
    "created_at",
];
const EXAM_REQUIRED: &[&str] = &["title", "group_name", "exam_date", "total_marks"];

const EXAM_RESULT_COLUMNS: &[&str] = &[
    "id",
    "exam_id",
    "student_id",
    "marks_obtained",
    "grade",
    "remarks",
    "created_at",
];
const EXAM_RESULT_REQUIRED: &[&str] = &["exam_id", "student_id", "marks_obtained"];

const QURAN_PROGRESS_COLUMNS: &[&str] = &[
    "id",
    "student_id",
    "date",
    "surah",
    "from_ayah",
    "to_ayah",
    "para",
    "rating",
    "remarks",
    "recorded_by",
    "created_at",
];
const QURAN_PROGRESS_REQUIRED: &[&str] = &[
    "student_id",
    "date",
    "surah",
    "from_ayah",
    "to_ayah",
    "recorded_by",
];

const NOTIFICATION_COLUMNS: &[&str] = &[
    "id",
    "recipient",
    "content",
    "instance_id",
    "status",
    "media_url",
    "sent_at",
    "created_at",
];
const NOTIFICATION_REQUIRED: &[&str] = &["recipient", "content", "instance_id", "status"];

const USER_COLUMNS: &[&str] = &["id", "name", "email", "role", "active", "created_at"];
const USER_REQUIRED: &[&str] = &["name", "email", "role"];

/// Columns every table fills in itself when an insert omits them.
const GENERATED: &[&str] = &["id", "created_at"];

// ---------------------------------------------------------------------------
// Joins
// ---------------------------------------------------------------------------

const STUDENT_NAME: Embed = Embed {
    relation: Table::Students,
    foreign_key: "student_id",
    columns: &["name"],
};

const EXAM_TITLE: Embed = Embed {
    relation: Table::Exams,
    foreign_key: "exam_id",
    columns: &["title"],
};

const PAYMENT_EMBEDS: &[Embed] = &[STUDENT_NAME];
const EXAM_RESULT_EMBEDS: &[Embed] = &[EXAM_TITLE, STUDENT_NAME];
const QURAN_PROGRESS_EMBEDS: &[Embed] = &[STUDENT_NAME];

impl Table {
    pub const ALL: [Table; 11] = [
        Table::Students,
        Table::Payments,
        Table::Expenses,
        Table::Teachers,
        Table::Staff,
        Table::Donations,
        Table::Exams,
        Table::ExamResults,
        Table::QuranProgress,
        Table::Notifications,
        Table::Users,
    ];

    /// Table name in the store.
    pub fn name(self) -> &'static str {
        match self {
            Table::Students => "students",
            Table::Payments => "payments",
            Table::Expenses => "expenses",
            Table::Teachers => "teachers",
            Table::Staff => "staff",
            Table::Donations => "donations",
            Table::Exams => "exams",
            Table::ExamResults => "exam_results",
            Table::QuranProgress => "quran_progress",
            Table::Notifications => "notifications",
            Table::Users => "users",
        }
    }

    /// Singular label used in user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            Table::Students => "Student",
            Table::Payments => "Payment",
            Table::Expenses => "Expense",
            Table::Teachers => "Teacher",
            Table::Staff => "Staff member",
            Table::Donations => "Donation",
            Table::Exams => "Exam",
            Table::ExamResults => "Exam result",
            Table::QuranProgress => "Quran progress entry",
            Table::Notifications => "Message",
            Table::Users => "User",
        }
    }

    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Table::Students => STUDENT_COLUMNS,
            Table::Payments => PAYMENT_COLUMNS,
            Table::Expenses => EXPENSE_COLUMNS,
            Table::Teachers => TEACHER_COLUMNS,
            Table::Staff => STAFF_COLUMNS,
            Table::Donations => DONATION_COLUMNS,
            Table::Exams => EXAM_COLUMNS,
            Table::ExamResults => EXAM_RESULT_COLUMNS,
            Table::QuranProgress => QURAN_PROGRESS_COLUMNS,
            Table::Notifications => NOTIFICATION_COLUMNS,
            Table::Users => USER_COLUMNS,
        }
    }

    /// Columns the store declares `NOT NULL` without a default.
    pub fn required(self) -> &'static [&'static str] {
        match self {
            Table::Students => STUDENT_REQUIRED,
            Table::Payments => PAYMENT_REQUIRED,
            Table::Expenses => EXPENSE_REQUIRED,
            Table::Teachers => TEACHER_REQUIRED,
            Table::Staff => STAFF_REQUIRED,
            Table::Donations => DONATION_REQUIRED,
            Table::Exams => EXAM_REQUIRED,
            Table::ExamResults => EXAM_RESULT_REQUIRED,
            Table::QuranProgress => QURAN_PROGRESS_REQUIRED,
            Table::Notifications => NOTIFICATION_REQUIRED,
            Table::Users => USER_REQUIRED,
        }
    }

    pub fn generated(self) -> &'static [&'static str] {
        GENERATED
    }

    pub fn embeds(self) -> &'static [Embed] {
        match self {
            Table::Payments => PAYMENT_EMBEDS,
            Table::ExamResults => EXAM_RESULT_EMBEDS,
            Table::QuranProgress => QURAN_PROGRESS_EMBEDS,
            _ => &[],
        }
    }

    pub fn has_column(self, column: &str) -> bool {
        self.columns().contains(&column)
    }

    pub fn from_name(name: &str) -> Option<Table> {
        Table::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
