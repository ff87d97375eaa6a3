mod common;

use common::{backend_with_employee, date};
use leavedesk::error::AppError;
use leavedesk::model::leave_request::LeaveStatus;
use leavedesk::store::{LeaveRequestStore, StoreError, UserStore};

/// The canonical walkthrough: balance 10, five-day request. Submission leaves
/// the balance alone, approval debits 5, cancellation credits it back.
#[tokio::test]
async fn approve_then_cancel_reconciles_balance() {
    let (backend, employee_id) = backend_with_employee(10);

    let request = backend
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
    assert_eq!(backend.service.balance_for(employee_id).await.unwrap(), 10);

    let approved = backend
        .service
        .approve(employee_id, request.id, None)
        .await
        .unwrap();
    assert_eq!(approved.status, LeaveStatus::Approved);
    assert_eq!(backend.service.balance_for(employee_id).await.unwrap(), 5);

    let cancelled = backend.service.cancel(employee_id, request.id).await.unwrap();
    assert_eq!(cancelled.status, LeaveStatus::Cancelled);
    assert_eq!(backend.service.balance_for(employee_id).await.unwrap(), 10);
}

#[tokio::test]
async fn approving_twice_fails_with_invalid_state() {
    let (backend, employee_id) = backend_with_employee(10);

    let request = backend
        .service
        .submit(
            employee_id,
            date("2024-01-01"),
            date("2024-01-03"),
            "Annual Leave".to_string(),
            String::new(),
        )
        .await
        .unwrap();

    backend
        .service
        .approve(employee_id, request.id, None)
        .await
        .unwrap();

    let err = backend
        .service
        .approve(employee_id, request.id, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::InvalidState {
            status: LeaveStatus::Approved,
            ..
        }
    ));
    // Only the first approval debited.
    assert_eq!(backend.service.balance_for(employee_id).await.unwrap(), 7);
}

/// The balance check at approval is the point of truth: a request that fit
/// the balance when submitted can still fail once earlier approvals have
/// drained it.
#[tokio::test]
async fn approval_rechecks_balance_at_approval_time() {
    let (backend, employee_id) = backend_with_employee(10);

    let first = backend
        .service
        .submit(
            employee_id,
            date("2024-01-01"),
            date("2024-01-06"),
            "Annual Leave".to_string(),
            String::new(),
        )
        .await
        .unwrap();
    let second = backend
        .service
        .submit(
            employee_id,
            date("2024-02-01"),
            date("2024-02-06"),
            "Annual Leave".to_string(),
            String::new(),
        )
        .await
        .unwrap();

    backend
        .service
        .approve(employee_id, first.id, None)
        .await
        .unwrap();
    assert_eq!(backend.service.balance_for(employee_id).await.unwrap(), 4);

    let err = backend
        .service
        .approve(employee_id, second.id, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::InsufficientBalance {
            requested: 6,
            balance: 4
        }
    ));

    // The failed approval changed nothing.
    let untouched = backend
        .requests
        .find_by_id(employee_id, second.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched.status, LeaveStatus::Pending);
    assert_eq!(backend.service.balance_for(employee_id).await.unwrap(), 4);
}

#[tokio::test]
async fn cancelling_a_pending_request_keeps_balance() {
    let (backend, employee_id) = backend_with_employee(10);

    let request = backend
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

    let cancelled = backend.service.cancel(employee_id, request.id).await.unwrap();
    assert_eq!(cancelled.status, LeaveStatus::Cancelled);
    assert_eq!(backend.service.balance_for(employee_id).await.unwrap(), 10);
}

#[tokio::test]
async fn cancelling_from_a_terminal_state_fails() {
    let (backend, employee_id) = backend_with_employee(20);

    let first = backend
        .service
        .submit(
            employee_id,
            date("2024-01-01"),
            date("2024-01-02"),
            "Annual Leave".to_string(),
            String::new(),
        )
        .await
        .unwrap();
    backend.service.cancel(employee_id, first.id).await.unwrap();

    let err = backend
        .service
        .cancel(employee_id, first.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::InvalidState {
            status: LeaveStatus::Cancelled,
            ..
        }
    ));

    let second = backend
        .service
        .submit(
            employee_id,
            date("2024-02-01"),
            date("2024-02-02"),
            "Annual Leave".to_string(),
            String::new(),
        )
        .await
        .unwrap();
    backend
        .service
        .reject(employee_id, second.id, "Coverage too thin")
        .await
        .unwrap();

    let err = backend
        .service
        .cancel(employee_id, second.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::InvalidState {
            status: LeaveStatus::Rejected,
            ..
        }
    ));
}

#[tokio::test]
async fn rejecting_requires_a_reason() {
    let (backend, employee_id) = backend_with_employee(10);

    let request = backend
        .service
        .submit(
            employee_id,
            date("2024-01-01"),
            date("2024-01-02"),
            "Annual Leave".to_string(),
            String::new(),
        )
        .await
        .unwrap();

    for reason in ["", "   "] {
        let err = backend
            .service
            .reject(employee_id, request.id, reason)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ReasonRequired));
    }
}

#[tokio::test]
async fn rejecting_stores_reason_and_keeps_balance() {
    let (backend, employee_id) = backend_with_employee(10);

    let request = backend
        .service
        .submit(
            employee_id,
            date("2024-01-01"),
            date("2024-01-02"),
            "Annual Leave".to_string(),
            String::new(),
        )
        .await
        .unwrap();

    let rejected = backend
        .service
        .reject(employee_id, request.id, "Too many people already off")
        .await
        .unwrap();
    assert_eq!(rejected.status, LeaveStatus::Rejected);
    assert_eq!(rejected.reason, "Too many people already off");
    assert_eq!(backend.service.balance_for(employee_id).await.unwrap(), 10);
}

#[tokio::test]
async fn rejecting_a_non_pending_request_fails() {
    let (backend, employee_id) = backend_with_employee(10);

    let request = backend
        .service
        .submit(
            employee_id,
            date("2024-01-01"),
            date("2024-01-02"),
            "Annual Leave".to_string(),
            String::new(),
        )
        .await
        .unwrap();
    backend
        .service
        .approve(employee_id, request.id, None)
        .await
        .unwrap();

    let err = backend
        .service
        .reject(employee_id, request.id, "Changed my mind")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::InvalidState {
            status: LeaveStatus::Approved,
            ..
        }
    ));
}

#[tokio::test]
async fn operations_on_unknown_requests_fail() {
    let (backend, employee_id) = backend_with_employee(10);

    assert!(matches!(
        backend.service.cancel(employee_id, 42).await.unwrap_err(),
        AppError::RequestNotFound { request_id: 42, .. }
    ));
    assert!(matches!(
        backend
            .service
            .approve(employee_id, 42, None)
            .await
            .unwrap_err(),
        AppError::RequestNotFound { request_id: 42, .. }
    ));
    assert!(matches!(
        backend
            .service
            .reject(employee_id, 42, "why not")
            .await
            .unwrap_err(),
        AppError::RequestNotFound { request_id: 42, .. }
    ));
}

/// The status update lands before the balance credit, so a failing credit is
/// surfaced as an out-of-sync condition rather than a business failure.
#[tokio::test]
async fn failed_credit_after_cancel_is_reported_as_out_of_sync() {
    let (backend, employee_id) = backend_with_employee(10);

    let request = backend
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
    backend
        .service
        .approve(employee_id, request.id, None)
        .await
        .unwrap();

    // Pull the user out from under the credit step.
    backend.users.delete(employee_id).await.unwrap();

    let err = backend
        .service
        .cancel(employee_id, request.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::BalanceOutOfSync {
            status: LeaveStatus::Cancelled,
            source: StoreError::RowNotFound,
            ..
        }
    ));

    // The status change was persisted before the credit was attempted.
    let stored = backend
        .requests
        .find_by_id(employee_id, request.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, LeaveStatus::Cancelled);
}

#[tokio::test]
async fn approval_reason_overwrites_submission_reason() {
    let (backend, employee_id) = backend_with_employee(10);

    let request = backend
        .service
        .submit(
            employee_id,
            date("2024-01-01"),
            date("2024-01-02"),
            "Annual Leave".to_string(),
            "Trip away".to_string(),
        )
        .await
        .unwrap();

    let approved = backend
        .service
        .approve(employee_id, request.id, Some("Enjoy".to_string()))
        .await
        .unwrap();
    assert_eq!(approved.reason, "Enjoy");
}
