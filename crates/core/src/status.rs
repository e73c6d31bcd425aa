//! Enumerated column values.
//!
//! The store's check constraints are the authority; these lists mirror them
//! so the console can reject bad input before a round trip.

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

pub const PAYMENT_PENDING: &str = "pending";
pub const PAYMENT_VERIFIED: &str = "verified";
pub const PAYMENT_REJECTED: &str = "rejected";

pub const PAYMENT_STATUSES: &[&str] = &[PAYMENT_PENDING, PAYMENT_VERIFIED, PAYMENT_REJECTED];

pub const PAYMENT_TYPE_MONTHLY_FEE: &str = "monthly_fee";
pub const PAYMENT_TYPE_ADMISSION: &str = "admission";
pub const PAYMENT_TYPE_EXAM: &str = "exam";
pub const PAYMENT_TYPE_OTHER: &str = "other";

pub const PAYMENT_TYPES: &[&str] = &[
    PAYMENT_TYPE_MONTHLY_FEE,
    PAYMENT_TYPE_ADMISSION,
    PAYMENT_TYPE_EXAM,
    PAYMENT_TYPE_OTHER,
];

// ---------------------------------------------------------------------------
// Expenses
// ---------------------------------------------------------------------------

pub const EXPENSE_PENDING: &str = "pending";
pub const EXPENSE_APPROVED: &str = "approved";
pub const EXPENSE_REJECTED: &str = "rejected";

pub const EXPENSE_STATUSES: &[&str] = &[EXPENSE_PENDING, EXPENSE_APPROVED, EXPENSE_REJECTED];

// ---------------------------------------------------------------------------
// Outbound messages
// ---------------------------------------------------------------------------

pub const NOTIFICATION_PENDING: &str = "pending";
pub const NOTIFICATION_SENT: &str = "sent";
pub const NOTIFICATION_FAILED: &str = "failed";

pub const NOTIFICATION_STATUSES: &[&str] =
    &[NOTIFICATION_PENDING, NOTIFICATION_SENT, NOTIFICATION_FAILED];

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_ACCOUNTANT: &str = "accountant";
pub const ROLE_TEACHER: &str = "teacher";

pub const USER_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_ACCOUNTANT, ROLE_TEACHER];
