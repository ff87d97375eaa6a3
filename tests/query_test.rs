mod common;

use common::{backend_with_employee, date};
use leavedesk::error::AppError;
use leavedesk::store::{StoreError, UserStore};

#[tokio::test]
async fn status_is_ordered_by_start_date() {
    let (backend, employee_id) = backend_with_employee(30);

    // Submitted out of calendar order.
    for (start, end) in [
        ("2024-03-01", "2024-03-02"),
        ("2024-01-01", "2024-01-02"),
        ("2024-02-01", "2024-02-02"),
    ] {
        backend
            .service
            .submit(
                employee_id,
                date(start),
                date(end),
                "Annual Leave".to_string(),
                String::new(),
            )
            .await
            .unwrap();
    }

    let requests = backend.service.status_for(employee_id).await.unwrap();
    let starts: Vec<_> = requests.iter().map(|r| r.start_date).collect();
    assert_eq!(
        starts,
        vec![date("2024-01-01"), date("2024-02-01"), date("2024-03-01")]
    );
}

#[tokio::test]
async fn zero_requests_is_an_error_not_an_empty_list() {
    let (backend, employee_id) = backend_with_employee(10);

    let err = backend.service.status_for(employee_id).await.unwrap_err();
    assert!(matches!(err, AppError::NoRequests(id) if id == employee_id));
}

#[tokio::test]
async fn balance_query_returns_current_balance() {
    let (backend, employee_id) = backend_with_employee(25);
    assert_eq!(backend.service.balance_for(employee_id).await.unwrap(), 25);
}

#[tokio::test]
async fn balance_query_for_unknown_user_fails() {
    let (backend, _) = backend_with_employee(25);

    let err = backend.service.balance_for(9999).await.unwrap_err();
    assert!(matches!(err, AppError::UserNotFound(9999)));
}

/// Store-level guard: the balance field can never be driven negative, even by
/// a caller that skips the service's own check.
#[tokio::test]
async fn adjust_balance_refuses_to_go_negative() {
    let (backend, employee_id) = backend_with_employee(5);

    let err = backend
        .users
        .adjust_balance(employee_id, -6)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::BalanceExhausted {
            delta: -6,
            ..
        }
    ));
    // Untouched after the refused debit.
    let user = backend.users.find_by_id(employee_id).await.unwrap().unwrap();
    assert_eq!(user.annual_leave_balance, 5);
}
