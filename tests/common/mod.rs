// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use leavedesk::service::leave::LeaveRequestService;
use leavedesk::store::memory::{MemoryLeaveRequestStore, MemoryUserStore};

/// Service wired to in-memory stores, with direct handles on the stores so
/// tests can seed users and inspect persisted state.
pub struct TestBackend {
    pub service: LeaveRequestService,
    pub users: Arc<MemoryUserStore>,
    pub requests: Arc<MemoryLeaveRequestStore>,
}

pub fn backend() -> TestBackend {
    let users = Arc::new(MemoryUserStore::new());
    let requests = Arc::new(MemoryLeaveRequestStore::new());
    let service = LeaveRequestService::new(users.clone(), requests.clone());
    TestBackend {
        service,
        users,
        requests,
    }
}

/// Backend with one seeded employee; returns the employee's id.
pub fn backend_with_employee(balance: i64) -> (TestBackend, u64) {
    let backend = backend();
    let employee_id = backend
        .users
        .seed("Test", "Employee", "test.employee@company.com", balance);
    (backend, employee_id)
}

/// Helper to parse a date string into a NaiveDate
pub fn date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}
