//! Console scenarios against the in-memory store: filtered lists,
//! client-side rejections, outages and not-found updates.

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use madrasa_core::error::CoreError;
use madrasa_core::session::Session;
use madrasa_db::models::*;
use madrasa_db::search::{filter_by_status, search};
use madrasa_db::summary::FinanceSummary;
use madrasa_db::{DataError, DataService, ListQuery, MemoryStore, Table};
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

fn new_student(name: &str, group: &str) -> NewStudent {
    NewStudent {
        name: name.to_string(),
        father_name: "Hasan".to_string(),
        mother_name: "Khadija".to_string(),
        whatsapp_number: "01711000000".to_string(),
        address: "Sylhet".to_string(),
        group_name: group.to_string(),
        monthly_fee: 500.0,
        active: Some(true),
        ..Default::default()
    }
}

fn expense(title: &str, amount: f64, category: &str) -> NewExpense {
    NewExpense {
        title: title.to_string(),
        amount,
        category: category.to_string(),
        subcategory: "general".to_string(),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Filtering and ordering
// ---------------------------------------------------------------------------

#[tokio::test]
async fn group_filter_returns_only_that_group() {
    let (service, _) = service();
    for (name, group) in [("Ali", "hifz"), ("Bilal", "nazera"), ("Omar", "hifz")] {
        service
            .students()
            .create(&office(), &new_student(name, group))
            .await
            .unwrap();
    }

    let hifz = service
        .students()
        .fetch_all(
            &ListQuery::new()
                .filter_eq("group_name", "hifz")
                .order_by("name", true),
        )
        .await;

    let names: Vec<&str> = hifz.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Ali", "Omar"]);
    for student in &hifz {
        assert_eq!(student.group_name, "hifz");
        assert!(student.active);
        assert_eq!(student.monthly_fee, 500.0);
        assert_eq!(student.father_name, "Hasan");
    }
}

#[tokio::test]
async fn unknown_column_fails_without_store_call() {
    let (service, store) = service();
    let mut rx = service.toasts().subscribe();

    let rows = service
        .students()
        .fetch_all(&ListQuery::new().order_by("nickname", true))
        .await;

    assert!(rows.is_empty());
    assert_eq!(store.call_count(), 0);
    assert!(rx.try_recv().unwrap().is_error());
}

// ---------------------------------------------------------------------------
// Client-side rejections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn zero_amount_expense_never_reaches_the_store() {
    let (service, store) = service();
    let mut rx = service.toasts().subscribe();

    let created = service
        .expenses()
        .create(&office(), &expense("Chalk", 0.0, "supplies"))
        .await;

    assert!(created.is_none());
    assert_eq!(store.call_count(), 0);
    let toast = rx.try_recv().unwrap();
    assert_eq!(toast.level, ToastLevel::Error);
    assert_eq!(toast.title, "Could not save expense");
    assert!(toast.message.contains("greater than zero"));

    let err = service
        .expenses()
        .try_create(&office(), &expense("Chalk", -5.0, "supplies"))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn empty_patch_is_rejected() {
    let (service, store) = service();
    let err = service
        .students()
        .try_update("s-1", &StudentPatch::default())
        .await
        .unwrap_err();
    assert_matches!(
        err,
        DataError::Core(CoreError::Validation(ref msg)) if msg == "No changes to save"
    );
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn updating_a_missing_record_is_not_found() {
    let (service, _) = service();
    let mut rx = service.toasts().subscribe();
    let patch = StudentPatch {
        name: Some("Renamed".into()),
        ..Default::default()
    };

    assert!(service.students().update("ghost", &patch).await.is_none());
    let toast = rx.try_recv().unwrap();
    assert_eq!(toast.message, "Student no longer exists");
    assert_eq!(toast.record_id.as_deref(), Some("ghost"));

    let err = service.students().try_update("ghost", &patch).await.unwrap_err();
    assert!(err.is_not_found());
}

// ---------------------------------------------------------------------------
// Outages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unreachable_store_yields_empty_list_and_error_toast() {
    let (service, store) = service();
    service
        .students()
        .create(&office(), &new_student("Ali", "hifz"))
        .await
        .unwrap();
    store.set_offline(true);
    let mut rx = service.toasts().subscribe();

    let rows = service.students().fetch_all(&ListQuery::new()).await;
    assert!(rows.is_empty());

    let toast = rx.try_recv().unwrap();
    assert!(toast.is_error());
    assert!(toast.message.starts_with("Could not reach the server"));

    let err = service
        .students()
        .try_fetch_all(&ListQuery::new())
        .await
        .unwrap_err();
    assert!(err.is_unreachable());
}

#[tokio::test]
async fn unreachable_store_fails_every_mutation_softly() {
    let (service, store) = service();
    store.set_offline(true);

    assert!(service
        .students()
        .create(&office(), &new_student("Ali", "hifz"))
        .await
        .is_none());
    let patch = StudentPatch {
        name: Some("X".into()),
        ..Default::default()
    };
    assert!(service.students().update("s-1", &patch).await.is_none());
    assert!(!service.students().delete("s-1").await);
    assert!(service.students().fetch_one("s-1").await.is_none());
}

#[tokio::test]
async fn table_counts_report_each_table() {
    let (service, store) = service();
    service
        .students()
        .create(&office(), &new_student("Ali", "hifz"))
        .await
        .unwrap();

    let mut rx = service.toasts().subscribe();
    let calls = store.call_count();

    let counts = service.table_counts().await;
    assert_eq!(counts.len(), Table::ALL.len());
    assert_matches!(counts[0], (Table::Students, Ok(1)));
    assert_matches!(counts[1], (Table::Payments, Ok(0)));
    assert_eq!(store.call_count() - calls, Table::ALL.len());
    assert!(rx.try_recv().is_err());

    store.set_offline(true);
    let counts = service.table_counts().await;
    assert!(counts.iter().all(|(_, r)| r.as_ref().is_err_and(DataError::is_unreachable)));
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn finance_summary_from_fetched_records() {
    let (service, _) = service();
    let session = office();
    let student = service
        .students()
        .create(&session, &new_student("Ali", "hifz"))
        .await
        .unwrap();

    let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    for amount in [500.0, 300.0] {
        service
            .payments()
            .create(
                &session,
                &NewPayment {
                    student_id: student.id.clone(),
                    amount,
                    date,
                    kind: "monthly_fee".into(),
                    status: None,
                    description: None,
                },
            )
            .await
            .unwrap();
    }
    let payments = service.payments().fetch_all(&ListQuery::new()).await;
    let first = payments.iter().find(|p| p.amount == 500.0).unwrap();
    service
        .payments()
        .update(&first.id, &PaymentPatch::verify(&session))
        .await
        .unwrap();

    let bill = service
        .expenses()
        .create(&session, &expense("Gas", 200.0, "utilities"))
        .await
        .unwrap();
    service
        .expenses()
        .update(&bill.id, &ExpensePatch::approve(&session))
        .await
        .unwrap();
    service
        .expenses()
        .create(&session, &expense("Books", 900.0, "education"))
        .await
        .unwrap();

    let summary = FinanceSummary::compute(
        &service.payments().fetch_all(&ListQuery::new()).await,
        &service.expenses().fetch_all(&ListQuery::new()).await,
        &service.donations().fetch_all(&ListQuery::new()).await,
    );
    assert_eq!(summary.collected, 500.0);
    assert_eq!(summary.pending, 300.0);
    assert_eq!(summary.expenses, 200.0);
    assert_eq!(summary.net_balance, 300.0);
    assert_eq!(summary.expenses_by_category.len(), 1);

    let expenses = service.expenses().fetch_all(&ListQuery::new()).await;
    assert_eq!(filter_by_status(&expenses, Some("pending"))[0].title, "Books");
    assert_eq!(search(&expenses, "GAS").len(), 1);
}
