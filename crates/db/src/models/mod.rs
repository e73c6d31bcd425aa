//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A camelCase domain struct implementing [`Record`](crate::record::Record),
//!   mapped from the store row (joined display names included)
//! - A `New*` create DTO for inserts
//! - A `*Patch` update DTO (all `Option` fields) for partial updates

pub mod donation;
pub mod exam;
pub mod exam_result;
pub mod expense;
pub mod notification;
pub mod payment;
pub mod quran_progress;
pub mod staff;
pub mod student;
pub mod teacher;
pub mod user;

pub use donation::{Donation, DonationPatch, NewDonation};
pub use exam::{Exam, ExamPatch, NewExam};
pub use exam_result::{ExamResult, ExamResultPatch, NewExamResult};
pub use expense::{Expense, ExpensePatch, NewExpense};
pub use notification::{NewNotification, Notification, NotificationPatch};
pub use payment::{NewPayment, Payment, PaymentPatch};
pub use quran_progress::{NewQuranProgress, QuranProgress, QuranProgressPatch};
pub use staff::{NewStaffMember, StaffMember, StaffMemberPatch};
pub use student::{NewStudent, Student, StudentPatch};
pub use teacher::{NewTeacher, Teacher, TeacherPatch};
pub use user::{NewUser, User, UserPatch};
