mod common;

use common::{backend_with_employee, date};
use leavedesk::error::AppError;
use leavedesk::model::leave_request::LeaveStatus;

#[tokio::test]
async fn submission_counts_days_inclusively_and_leaves_balance_alone() {
    let (backend, employee_id) = backend_with_employee(10);

    let created = backend
        .service
        .submit(
            employee_id,
            date("2024-01-01"),
            date("2024-01-05"),
            "Annual Leave".to_string(),
            "Family holiday".to_string(),
        )
        .await
        .unwrap();

    assert_eq!(created.status, LeaveStatus::Pending);
    assert_eq!(created.day_count(), 5);
    // Balance is only debited at approval, never at submission.
    assert_eq!(backend.service.balance_for(employee_id).await.unwrap(), 10);
}

#[tokio::test]
async fn submission_exceeding_balance_fails_and_creates_no_record() {
    let (backend, employee_id) = backend_with_employee(3);

    let err = backend
        .service
        .submit(
            employee_id,
            date("2024-01-01"),
            date("2024-01-05"),
            "Annual Leave".to_string(),
            String::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::InsufficientBalance {
            requested: 5,
            balance: 3
        }
    ));
    assert!(matches!(
        backend.service.status_for(employee_id).await.unwrap_err(),
        AppError::NoRequests(_)
    ));
}

#[tokio::test]
async fn overlapping_submission_is_rejected() {
    let (backend, employee_id) = backend_with_employee(30);

    let first = backend
        .service
        .submit(
            employee_id,
            date("2024-01-01"),
            date("2024-01-05"),
            "Annual Leave".to_string(),
            String::new(),
        )
        .await
        .unwrap();

    // Shares exactly one day with the first request.
    let err = backend
        .service
        .submit(
            employee_id,
            date("2024-01-05"),
            date("2024-01-10"),
            "Annual Leave".to_string(),
            String::new(),
        )
        .await
        .unwrap_err();

    match err {
        AppError::OverlappingRequest { existing } => assert_eq!(existing, first.id),
        other => panic!("expected overlap error, got {other:?}"),
    }
}

#[tokio::test]
async fn adjacent_ranges_are_accepted() {
    let (backend, employee_id) = backend_with_employee(30);

    backend
        .service
        .submit(
            employee_id,
            date("2024-01-01"),
            date("2024-01-05"),
            "Annual Leave".to_string(),
            String::new(),
        )
        .await
        .unwrap();

    // Starts the day after the first request ends.
    backend
        .service
        .submit(
            employee_id,
            date("2024-01-06"),
            date("2024-01-10"),
            "Annual Leave".to_string(),
            String::new(),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn cancelled_and_rejected_requests_do_not_block_dates() {
    let (backend, employee_id) = backend_with_employee(30);

    let first = backend
        .service
        .submit(
            employee_id,
            date("2024-02-01"),
            date("2024-02-05"),
            "Annual Leave".to_string(),
            String::new(),
        )
        .await
        .unwrap();
    backend.service.cancel(employee_id, first.id).await.unwrap();

    let second = backend
        .service
        .submit(
            employee_id,
            date("2024-02-01"),
            date("2024-02-05"),
            "Annual Leave".to_string(),
            String::new(),
        )
        .await
        .unwrap();
    backend
        .service
        .reject(employee_id, second.id, "Team is at capacity")
        .await
        .unwrap();

    // Same dates again; both earlier requests are out of the overlap set.
    backend
        .service
        .submit(
            employee_id,
            date("2024-02-01"),
            date("2024-02-05"),
            "Annual Leave".to_string(),
            String::new(),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn end_date_before_start_date_fails() {
    let (backend, employee_id) = backend_with_employee(10);

    let err = backend
        .service
        .submit(
            employee_id,
            date("2024-01-05"),
            date("2024-01-01"),
            "Annual Leave".to_string(),
            String::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::DateOrder { .. }));
}

#[tokio::test]
async fn reason_longer_than_128_chars_fails() {
    let (backend, employee_id) = backend_with_employee(10);

    let err = backend
        .service
        .submit(
            employee_id,
            date("2024-01-01"),
            date("2024-01-01"),
            "Annual Leave".to_string(),
            "x".repeat(129),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ReasonTooLong));
}

#[tokio::test]
async fn unknown_employee_fails() {
    let (backend, _) = backend_with_employee(10);

    let err = backend
        .service
        .submit(
            9999,
            date("2024-01-01"),
            date("2024-01-01"),
            "Annual Leave".to_string(),
            String::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::UserNotFound(9999)));
}

#[tokio::test]
async fn concurrent_overlapping_submissions_admit_exactly_one() {
    let (backend, employee_id) = backend_with_employee(30);

    let first = backend.service.submit(
        employee_id,
        date("2024-03-04"),
        date("2024-03-08"),
        "Annual Leave".to_string(),
        String::new(),
    );
    let second = backend.service.submit(
        employee_id,
        date("2024-03-06"),
        date("2024-03-12"),
        "Annual Leave".to_string(),
        String::new(),
    );

    let (a, b) = tokio::join!(first, second);
    let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1);
}
