//! Client-side filtering over fetched records, as the list views do it.

use crate::models::{
    Donation, Exam, ExamResult, Expense, Notification, Payment, QuranProgress, StaffMember,
    Student, Teacher, User,
};

/// A record a list view can search by free text.
pub trait Searchable {
    /// Text fields matched against the search term.
    fn search_fields(&self) -> Vec<&str>;

    /// Workflow status, for records that have one.
    fn status(&self) -> Option<&str> {
        None
    }
}

/// Case-insensitive substring match over [`Searchable::search_fields`].
/// A blank term matches everything.
pub fn matches<T: Searchable>(item: &T, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    needle.is_empty()
        || item
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
}

pub fn search<'a, T: Searchable>(items: &'a [T], term: &str) -> Vec<&'a T> {
    items.iter().filter(|item| matches(*item, term)).collect()
}

/// Keep items whose status equals `status`; `None` or `"all"` keeps everything.
pub fn filter_by_status<'a, T: Searchable>(items: &'a [T], status: Option<&str>) -> Vec<&'a T> {
    match status {
        None | Some("all") => items.iter().collect(),
        Some(wanted) => items
            .iter()
            .filter(|item| item.status() == Some(wanted))
            .collect(),
    }
}

impl Searchable for Student {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.father_name.as_str(),
            self.enrollment_number.as_deref().unwrap_or_default(),
            self.whatsapp_number.as_str(),
        ]
    }
}

impl Searchable for Payment {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.student_name.as_str(),
            self.kind.as_str(),
            self.description.as_deref().unwrap_or_default(),
            self.accepted_by.as_str(),
        ]
    }

    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}

impl Searchable for Expense {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.category.as_str(),
            self.subcategory.as_str(),
            self.description.as_deref().unwrap_or_default(),
        ]
    }

    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}

impl Searchable for Teacher {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.phone.as_str(),
            self.subject.as_deref().unwrap_or_default(),
        ]
    }
}

impl Searchable for StaffMember {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.role.as_str(), self.phone.as_str()]
    }
}

impl Searchable for Donation {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.donor_name.as_str(),
            self.donor_phone.as_deref().unwrap_or_default(),
            self.purpose.as_deref().unwrap_or_default(),
        ]
    }
}

impl Searchable for Exam {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.group_name.as_str()]
    }
}

impl Searchable for ExamResult {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.student_name.as_str(),
            self.exam_title.as_str(),
            self.grade.as_deref().unwrap_or_default(),
        ]
    }
}

impl Searchable for QuranProgress {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.student_name.as_str(), self.surah.as_str(), self.recorded_by.as_str()]
    }
}

impl Searchable for Notification {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.recipient.as_str(), self.content.as_str()]
    }

    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}

impl Searchable for User {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str(), self.role.as_str()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use serde_json::json;

    fn student(name: &str, enrollment: &str) -> Student {
        let row = json!({
            "id": name,
            "name": name,
            "father_name": "Rahim",
            "enrollment_number": enrollment,
        });
        Student::from_row(row.as_object().unwrap())
    }

    fn payment(id: &str, status: &str) -> Payment {
        let row = json!({"id": id, "status": status, "amount": 100});
        Payment::from_row(row.as_object().unwrap())
    }

    #[test]
    fn search_is_case_insensitive() {
        let students = vec![student("Abdul Karim", "H-1"), student("Yusuf", "N-2")];
        let found = search(&students, "KARIM");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Abdul Karim");
        assert_eq!(search(&students, "n-2")[0].name, "Yusuf");
    }

    #[test]
    fn blank_term_matches_all() {
        let students = vec![student("A", ""), student("B", "")];
        assert_eq!(search(&students, "  ").len(), 2);
    }

    #[test]
    fn status_filter() {
        let payments = vec![payment("1", "pending"), payment("2", "verified")];
        assert_eq!(filter_by_status(&payments, Some("verified"))[0].id, "2");
        assert_eq!(filter_by_status(&payments, Some("all")).len(), 2);
        assert_eq!(filter_by_status(&payments, None).len(), 2);
    }

    #[test]
    fn records_without_status_never_match_a_status() {
        let students = vec![student("A", "")];
        assert!(filter_by_status(&students, Some("pending")).is_empty());
    }
}
