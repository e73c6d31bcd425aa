//! Facade CRUD against the in-memory store:
//! - create/fetch round trip for every entity
//! - partial updates leave other columns alone
//! - delete removes exactly the targeted record
//! - joined display names come back on list fetches
//! - success toasts on mutations

use std::sync::Arc;

use chrono::NaiveDate;
use madrasa_core::session::Session;
use madrasa_db::models::*;
use madrasa_db::{DataService, ListQuery, MemoryStore};
use madrasa_events::{ToastBus, ToastLevel};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn service() -> (DataService, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let service = DataService::new(store.clone(), Arc::new(ToastBus::default()));
    (service, store)
}

fn office() -> Session {
    Session::new("u-1", "Office Desk", "accountant")
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_student(name: &str, group: &str) -> NewStudent {
    NewStudent {
        name: name.to_string(),
        father_name: "Abdur Rahim".to_string(),
        mother_name: "Amina".to_string(),
        whatsapp_number: "+8801711000000".to_string(),
        address: "Mirpur 10, Dhaka".to_string(),
        group_name: group.to_string(),
        monthly_fee: 500.0,
        ..Default::default()
    }
}

fn new_payment(student_id: &str, amount: f64) -> NewPayment {
    NewPayment {
        student_id: student_id.to_string(),
        amount,
        date: day(2024, 3, 1),
        kind: "monthly_fee".to_string(),
        status: None,
        description: None,
    }
}

// ---------------------------------------------------------------------------
// Round trips
// ---------------------------------------------------------------------------

#[tokio::test]
async fn student_create_then_fetch_round_trips() {
    let (service, _) = service();
    let created = service
        .students()
        .create(&office(), &new_student("Abdul Karim", "hifz"))
        .await
        .expect("student should be created");

    assert!(!created.id.is_empty());
    assert!(created.created_at.is_some());
    assert!(created.active);

    let fetched = service.students().fetch_one(&created.id).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.father_name, "Abdur Rahim");
    assert_eq!(fetched.monthly_fee, 500.0);
}

#[tokio::test]
async fn every_entity_round_trips() {
    let (service, _) = service();
    let session = office();

    let student = service
        .students()
        .create(&session, &new_student("Yusuf", "nazera"))
        .await
        .unwrap();

    let payment = service
        .payments()
        .create(&session, &new_payment(&student.id, 500.0))
        .await
        .unwrap();
    assert_eq!(payment.status, "pending");
    assert_eq!(payment.accepted_by, "Office Desk");

    let expense = service
        .expenses()
        .create(
            &session,
            &NewExpense {
                title: "Electricity bill".into(),
                amount: 1200.0,
                category: "utilities".into(),
                subcategory: "electricity".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(expense.created_by, "Office Desk");

    let teacher = service
        .teachers()
        .create(
            &session,
            &NewTeacher {
                name: "Maulana Idris".into(),
                phone: "01811000000".into(),
                subject: Some("Tajweed".into()),
                salary: Some(15000.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(teacher.subject.as_deref(), Some("Tajweed"));
    assert_eq!(teacher.salary, Some(15000.0));

    let staff = service
        .staff()
        .create(
            &session,
            &NewStaffMember {
                name: "Rafiq".into(),
                role: "guard".into(),
                phone: "01911000000".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(staff.role, "guard");

    let donation = service
        .donations()
        .create(
            &session,
            &NewDonation {
                donor_name: "Haji Salam".into(),
                donor_phone: None,
                amount: 10000.0,
                date: day(2024, 3, 5),
                purpose: Some("Ramadan iftar".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(donation.accepted_by, "Office Desk");

    let exam = service
        .exams()
        .create(
            &session,
            &NewExam {
                title: "Half-yearly".into(),
                group_name: "nazera".into(),
                exam_date: day(2024, 6, 10),
                total_marks: 100.0,
            },
        )
        .await
        .unwrap();

    let result = service
        .exam_results()
        .create(
            &session,
            &NewExamResult {
                exam_id: exam.id.clone(),
                student_id: student.id.clone(),
                marks_obtained: 88.0,
                grade: Some("A".into()),
                remarks: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(result.exam_title, "Half-yearly");
    assert_eq!(result.student_name, "Yusuf");

    let lesson = service
        .quran_progress()
        .create(
            &session,
            &NewQuranProgress {
                student_id: student.id.clone(),
                date: day(2024, 3, 2),
                surah: "Al-Mulk".into(),
                from_ayah: 1,
                to_ayah: 10,
                para: Some(29),
                rating: Some("good".into()),
                remarks: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(lesson.recorded_by, "Office Desk");
    assert_eq!(lesson.student_name, "Yusuf");

    let message = service
        .notifications()
        .create(
            &session,
            &NewNotification {
                recipient: "+8801711000000".into(),
                content: "Fee received, JazakAllah".into(),
                instance_id: "inst-1".into(),
                media_url: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(message.status, "pending");

    let user = service
        .users()
        .create(
            &session,
            &NewUser {
                name: "Accounts".into(),
                email: "Accounts@Madrasa.org".into(),
                role: "accountant".into(),
                active: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(user.email, "accounts@madrasa.org");

    assert_eq!(
        service.payments().fetch_one(&payment.id).await.unwrap(),
        payment
    );
    assert_eq!(
        service.expenses().fetch_one(&expense.id).await.unwrap(),
        expense
    );
    assert_eq!(
        service.teachers().fetch_one(&teacher.id).await.unwrap(),
        teacher
    );
    assert_eq!(service.staff().fetch_one(&staff.id).await.unwrap(), staff);
    assert_eq!(
        service.donations().fetch_one(&donation.id).await.unwrap(),
        donation
    );
    assert_eq!(service.exams().fetch_one(&exam.id).await.unwrap(), exam);
    assert_eq!(
        service.exam_results().fetch_one(&result.id).await.unwrap(),
        result
    );
    assert_eq!(
        service.quran_progress().fetch_one(&lesson.id).await.unwrap(),
        lesson
    );
    assert_eq!(
        service.notifications().fetch_one(&message.id).await.unwrap(),
        message
    );
    assert_eq!(service.users().fetch_one(&user.id).await.unwrap(), user);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn partial_update_changes_only_provided_fields() {
    let (service, _) = service();
    let before = service
        .students()
        .create(&office(), &new_student("Abdul Karim", "hifz"))
        .await
        .unwrap();

    let patch = StudentPatch {
        group_name: Some("nazera".into()),
        ..Default::default()
    };
    let echoed = service.students().update(&before.id, &patch).await.unwrap();
    assert_eq!(echoed.group_name, "nazera");

    let expected = Student {
        group_name: "nazera".into(),
        ..before.clone()
    };
    let stored = service.students().fetch_one(&before.id).await.unwrap();
    assert_eq!(stored, expected);
    assert_eq!(echoed, expected);

    let listed = service.students().fetch_all(&ListQuery::new()).await;
    assert_eq!(listed, vec![expected]);
}

#[tokio::test]
async fn verify_payment_stamps_verifier() {
    let (service, _) = service();
    let student = service
        .students()
        .create(&office(), &new_student("Ali", "hifz"))
        .await
        .unwrap();
    let payment = service
        .payments()
        .create(&office(), &new_payment(&student.id, 300.0))
        .await
        .unwrap();

    let principal = Session::new("u-9", "Principal", "admin");
    let verified = service
        .payments()
        .update(&payment.id, &PaymentPatch::verify(&principal))
        .await
        .unwrap();

    assert_eq!(verified.status, "verified");
    assert_eq!(verified.verified_by.as_deref(), Some("Principal"));
    assert_eq!(verified.accepted_by, "Office Desk");
    assert_eq!(verified.amount, 300.0);
}

#[tokio::test]
async fn approve_expense_and_mark_message_sent() {
    let (service, _) = service();
    let session = office();
    let expense = service
        .expenses()
        .create(
            &session,
            &NewExpense {
                title: "Rice".into(),
                amount: 4500.0,
                category: "food".into(),
                subcategory: "groceries".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let approved = service
        .expenses()
        .update(&expense.id, &ExpensePatch::approve(&session))
        .await
        .unwrap();
    assert_eq!(approved.status, "approved");

    let message = service
        .notifications()
        .create(
            &session,
            &NewNotification {
                recipient: "+8801711000000".into(),
                content: "Exam on Sunday".into(),
                instance_id: "inst-1".into(),
                media_url: None,
            },
        )
        .await
        .unwrap();
    let at = chrono::Utc::now();
    let sent = service
        .notifications()
        .update(&message.id, &NotificationPatch::sent(at))
        .await
        .unwrap();
    assert_eq!(sent.status, "sent");
    assert!(sent.sent_at.is_some());
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_removes_only_the_target() {
    let (service, _) = service();
    let a = service
        .students()
        .create(&office(), &new_student("A", "hifz"))
        .await
        .unwrap();
    let b = service
        .students()
        .create(&office(), &new_student("B", "hifz"))
        .await
        .unwrap();

    assert!(service.students().delete(&a.id).await);

    let remaining = service.students().fetch_all(&ListQuery::new()).await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, b.id);
    assert!(service.students().fetch_one(&a.id).await.is_none());
}

#[tokio::test]
async fn deleting_a_missing_id_still_succeeds() {
    let (service, _) = service();
    assert!(service.students().delete("does-not-exist").await);
    assert_eq!(service.students().try_delete("does-not-exist").await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Joins and toasts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn payment_list_carries_student_names() {
    let (service, _) = service();
    let karim = service
        .students()
        .create(&office(), &new_student("Abdul Karim", "hifz"))
        .await
        .unwrap();
    service
        .payments()
        .create(&office(), &new_payment(&karim.id, 500.0))
        .await
        .unwrap();

    let payments = service
        .payments()
        .fetch_all(&ListQuery::new().order_by("created_at", false))
        .await;
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].student_name, "Abdul Karim");
}

#[tokio::test]
async fn mutations_publish_success_toasts() {
    let (service, _) = service();
    let mut rx = service.toasts().subscribe();

    let student = service
        .students()
        .create(&office(), &new_student("Ali", "hifz"))
        .await
        .unwrap();

    let toast = rx.try_recv().unwrap();
    assert_eq!(toast.level, ToastLevel::Success);
    assert_eq!(toast.title, "Student saved");
    assert_eq!(toast.record_id.as_deref(), Some(student.id.as_str()));

    service.students().delete(&student.id).await;
    assert_eq!(rx.try_recv().unwrap().title, "Student deleted");
}
