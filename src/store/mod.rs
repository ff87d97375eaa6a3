pub mod memory;
pub mod mysql;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::model::leave_request::{LeaveRequest, LeaveStatus, NewLeaveRequest};
use crate::model::manager::ManagerPair;
use crate::model::user::{NewUser, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("row not found")]
    RowNotFound,

    /// The conditional balance update refused to run because it would have
    /// driven `annual_leave_balance` negative.
    #[error("a change of {delta} days would drive the balance of user {user_id} negative")]
    BalanceExhausted { user_id: u64, delta: i64 },

    #[error("duplicate value: {0}")]
    Duplicate(String),

    #[error("unrecognised leave status in storage: {0}")]
    InvalidStatus(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Read/update access to users and their leave balance.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: u64) -> Result<Option<User>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_all(&self) -> Result<Vec<User>, StoreError>;
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;
    async fn update(&self, user: &User) -> Result<User, StoreError>;
    async fn delete(&self, id: u64) -> Result<bool, StoreError>;

    /// Atomic read-modify-write of the balance field. Fails with
    /// `BalanceExhausted` instead of storing a negative balance.
    async fn adjust_balance(&self, id: u64, delta_days: i64) -> Result<User, StoreError>;
}

/// CRUD plus the range query the overlap check depends on.
#[async_trait]
pub trait LeaveRequestStore: Send + Sync {
    async fn find_by_id(
        &self,
        employee_id: u64,
        request_id: u64,
    ) -> Result<Option<LeaveRequest>, StoreError>;

    /// Requests for `employee_id` whose inclusive [start, end] range shares at
    /// least one day with the given range, excluding the listed statuses.
    async fn find_overlapping(
        &self,
        employee_id: u64,
        start: NaiveDate,
        end: NaiveDate,
        excluded: &[LeaveStatus],
    ) -> Result<Vec<LeaveRequest>, StoreError>;

    /// All requests for the employee, ordered by start date ascending with
    /// id as tie-break.
    async fn find_all_for_employee(&self, employee_id: u64)
    -> Result<Vec<LeaveRequest>, StoreError>;

    async fn insert(&self, request: NewLeaveRequest) -> Result<LeaveRequest, StoreError>;

    /// Persist a status transition. `reason` of `None` leaves the stored
    /// reason untouched.
    async fn update_status(
        &self,
        request_id: u64,
        status: LeaveStatus,
        reason: Option<&str>,
    ) -> Result<LeaveRequest, StoreError>;
}

#[async_trait]
pub trait ManagerStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<ManagerPair>, StoreError>;
    async fn find_by_user(&self, user_id: u64) -> Result<Option<ManagerPair>, StoreError>;
    async fn insert(&self, user_id: u64, manager_id: u64) -> Result<ManagerPair, StoreError>;
    async fn update_manager(
        &self,
        user_id: u64,
        manager_id: u64,
    ) -> Result<ManagerPair, StoreError>;
    async fn delete(&self, id: u64) -> Result<bool, StoreError>;
}
