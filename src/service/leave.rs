use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tokio::sync::OwnedMutexGuard;
use tracing::{error, info};

use crate::error::AppError;
use crate::model::leave_request::{
    LeaveRequest, LeaveStatus, MAX_REASON_LEN, NewLeaveRequest, day_count,
};
use crate::store::{LeaveRequestStore, UserStore};

/// Statuses that never block a new request's date range.
const OVERLAP_EXCLUDED: [LeaveStatus; 2] = [LeaveStatus::Cancelled, LeaveStatus::Rejected];

/// One async mutex per employee. Every mutating operation holds the
/// employee's lock across its whole read-check-write sequence, which closes
/// the window where two concurrent calls could both pass the overlap or
/// balance check before either persists.
#[derive(Default)]
struct EmployeeLocks {
    inner: Mutex<HashMap<u64, Arc<tokio::sync::Mutex<()>>>>,
}

impl EmployeeLocks {
    async fn acquire(&self, employee_id: u64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap();
            map.entry(employee_id).or_default().clone()
        };
        lock.lock_owned().await
    }
}

/// Owns the leave-request state machine, balance arithmetic and overlap
/// checks. All state lives in the injected stores; the service itself only
/// holds the per-employee locks.
pub struct LeaveRequestService {
    users: Arc<dyn UserStore>,
    requests: Arc<dyn LeaveRequestStore>,
    locks: EmployeeLocks,
}

impl LeaveRequestService {
    pub fn new(users: Arc<dyn UserStore>, requests: Arc<dyn LeaveRequestStore>) -> Self {
        Self {
            users,
            requests,
            locks: EmployeeLocks::default(),
        }
    }

    /// Create a new Pending request. The balance is checked but not debited;
    /// the debit happens at approval.
    pub async fn submit(
        &self,
        employee_id: u64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        leave_type: String,
        reason: String,
    ) -> Result<LeaveRequest, AppError> {
        if reason.chars().count() > MAX_REASON_LEN {
            return Err(AppError::ReasonTooLong);
        }
        if start_date > end_date {
            return Err(AppError::DateOrder {
                start: start_date,
                end: end_date,
            });
        }

        let _guard = self.locks.acquire(employee_id).await;

        let user = self
            .users
            .find_by_id(employee_id)
            .await?
            .ok_or(AppError::UserNotFound(employee_id))?;

        let requested = day_count(start_date, end_date);
        if requested > user.annual_leave_balance {
            return Err(AppError::InsufficientBalance {
                requested,
                balance: user.annual_leave_balance,
            });
        }

        let open = self
            .requests
            .find_overlapping(employee_id, start_date, end_date, &OVERLAP_EXCLUDED)
            .await?;
        if let Some(existing) = open.first() {
            return Err(AppError::OverlappingRequest {
                existing: existing.id,
            });
        }

        let created = self
            .requests
            .insert(NewLeaveRequest {
                employee_id,
                start_date,
                end_date,
                leave_type,
                reason,
            })
            .await?;

        info!(
            employee_id,
            request_id = created.id,
            days = requested,
            "Leave request submitted"
        );
        Ok(created)
    }

    /// Cancel a Pending or Approved request. Cancelling an Approved request
    /// credits back exactly the day count that approval debited.
    pub async fn cancel(&self, employee_id: u64, request_id: u64) -> Result<LeaveRequest, AppError> {
        let _guard = self.locks.acquire(employee_id).await;

        let request = self
            .requests
            .find_by_id(employee_id, request_id)
            .await?
            .ok_or(AppError::RequestNotFound {
                employee_id,
                request_id,
            })?;

        if request.status.is_terminal() {
            return Err(AppError::InvalidState {
                status: request.status,
                action: "cancelled",
            });
        }

        let was_approved = request.status == LeaveStatus::Approved;
        let updated = self
            .requests
            .update_status(request_id, LeaveStatus::Cancelled, None)
            .await?;

        if was_approved {
            let days = updated.day_count();
            if let Err(source) = self.users.adjust_balance(employee_id, days).await {
                // The request is already Cancelled on disk; surface this as an
                // inconsistency rather than a business failure.
                error!(
                    employee_id,
                    request_id,
                    days,
                    error = %source,
                    "Request cancelled but balance credit failed"
                );
                return Err(AppError::BalanceOutOfSync {
                    request_id,
                    status: LeaveStatus::Cancelled,
                    source,
                });
            }
            info!(employee_id, request_id, days, "Cancelled approved leave, balance credited");
        } else {
            info!(employee_id, request_id, "Cancelled pending leave");
        }

        Ok(updated)
    }

    /// Approve a Pending request and debit the balance. The balance check
    /// here is the point of truth; submission only pre-screens.
    pub async fn approve(
        &self,
        employee_id: u64,
        request_id: u64,
        reason: Option<String>,
    ) -> Result<LeaveRequest, AppError> {
        let _guard = self.locks.acquire(employee_id).await;

        let request = self
            .requests
            .find_by_id(employee_id, request_id)
            .await?
            .ok_or(AppError::RequestNotFound {
                employee_id,
                request_id,
            })?;

        if request.status != LeaveStatus::Pending {
            return Err(AppError::InvalidState {
                status: request.status,
                action: "approved",
            });
        }

        let user = self
            .users
            .find_by_id(employee_id)
            .await?
            .ok_or(AppError::UserNotFound(employee_id))?;

        let requested = request.day_count();
        if requested > user.annual_leave_balance {
            return Err(AppError::InsufficientBalance {
                requested,
                balance: user.annual_leave_balance,
            });
        }

        let reason = reason.unwrap_or_default();
        let updated = self
            .requests
            .update_status(request_id, LeaveStatus::Approved, Some(&reason))
            .await?;

        if let Err(source) = self.users.adjust_balance(employee_id, -requested).await {
            error!(
                employee_id,
                request_id,
                days = requested,
                error = %source,
                "Request approved but balance debit failed"
            );
            return Err(AppError::BalanceOutOfSync {
                request_id,
                status: LeaveStatus::Approved,
                source,
            });
        }

        info!(employee_id, request_id, days = requested, "Leave approved, balance debited");
        Ok(updated)
    }

    /// Reject a Pending request. A non-empty reason is mandatory; the balance
    /// is untouched since nothing was ever debited.
    pub async fn reject(
        &self,
        employee_id: u64,
        request_id: u64,
        reason: &str,
    ) -> Result<LeaveRequest, AppError> {
        if reason.trim().is_empty() {
            return Err(AppError::ReasonRequired);
        }
        if reason.chars().count() > MAX_REASON_LEN {
            return Err(AppError::ReasonTooLong);
        }

        let _guard = self.locks.acquire(employee_id).await;

        let request = self
            .requests
            .find_by_id(employee_id, request_id)
            .await?
            .ok_or(AppError::RequestNotFound {
                employee_id,
                request_id,
            })?;

        if request.status != LeaveStatus::Pending {
            return Err(AppError::InvalidState {
                status: request.status,
                action: "rejected",
            });
        }

        let updated = self
            .requests
            .update_status(request_id, LeaveStatus::Rejected, Some(reason))
            .await?;

        info!(employee_id, request_id, "Leave rejected");
        Ok(updated)
    }

    /// All requests for the employee, ordered by start date. Zero requests is
    /// reported as not-found, never as an empty success; callers rely on the
    /// distinction.
    pub async fn status_for(&self, employee_id: u64) -> Result<Vec<LeaveRequest>, AppError> {
        let requests = self.requests.find_all_for_employee(employee_id).await?;
        if requests.is_empty() {
            return Err(AppError::NoRequests(employee_id));
        }
        Ok(requests)
    }

    pub async fn balance_for(&self, employee_id: u64) -> Result<i64, AppError> {
        let user = self
            .users
            .find_by_id(employee_id)
            .await?
            .ok_or(AppError::UserNotFound(employee_id))?;
        Ok(user.annual_leave_balance)
    }
}
