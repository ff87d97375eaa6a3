//! In-memory store backends. Substituted for the MySQL ones in tests, as the
//! service only ever talks to the store traits.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use crate::model::leave_request::{
    LeaveRequest, LeaveStatus, NewLeaveRequest, ranges_overlap,
};
use crate::model::user::{NewUser, User};
use crate::store::{LeaveRequestStore, StoreError, UserStore};

pub struct MemoryUserStore {
    users: Mutex<HashMap<u64, User>>,
    next_id: AtomicU64,
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Seed a user and return its id.
    pub fn seed(&self, firstname: &str, surname: &str, email: &str, balance: i64) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.users.lock().unwrap().insert(
            id,
            User {
                id,
                firstname: firstname.to_string(),
                surname: surname.to_string(),
                email: email.to_string(),
                password: String::new(),
                role_id: 3,
                annual_leave_balance: balance,
            },
        );
        id
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: u64) -> Result<Option<User>, StoreError> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        let mut users: Vec<User> = self.users.lock().unwrap().values().cloned().collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate(user.email));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let user = User {
            id,
            firstname: user.firstname,
            surname: user.surname,
            email: user.email,
            password: user.password,
            role_id: user.role_id,
            annual_leave_balance: user.annual_leave_balance,
        };
        users.insert(id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();
        if !users.contains_key(&user.id) {
            return Err(StoreError::RowNotFound);
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn delete(&self, id: u64) -> Result<bool, StoreError> {
        Ok(self.users.lock().unwrap().remove(&id).is_some())
    }

    async fn adjust_balance(&self, id: u64, delta_days: i64) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(&id).ok_or(StoreError::RowNotFound)?;
        // Same guard the SQL backend enforces in its conditional UPDATE.
        if user.annual_leave_balance + delta_days < 0 {
            return Err(StoreError::BalanceExhausted {
                user_id: id,
                delta: delta_days,
            });
        }
        user.annual_leave_balance += delta_days;
        Ok(user.clone())
    }
}

pub struct MemoryLeaveRequestStore {
    requests: Mutex<HashMap<u64, LeaveRequest>>,
    next_id: AtomicU64,
}

impl Default for MemoryLeaveRequestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLeaveRequestStore {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl LeaveRequestStore for MemoryLeaveRequestStore {
    async fn find_by_id(
        &self,
        employee_id: u64,
        request_id: u64,
    ) -> Result<Option<LeaveRequest>, StoreError> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .get(&request_id)
            .filter(|r| r.employee_id == employee_id)
            .cloned())
    }

    async fn find_overlapping(
        &self,
        employee_id: u64,
        start: NaiveDate,
        end: NaiveDate,
        excluded: &[LeaveStatus],
    ) -> Result<Vec<LeaveRequest>, StoreError> {
        let mut hits: Vec<LeaveRequest> = self
            .requests
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.employee_id == employee_id)
            .filter(|r| !excluded.contains(&r.status))
            .filter(|r| ranges_overlap(r.start_date, r.end_date, start, end))
            .cloned()
            .collect();
        hits.sort_by_key(|r| (r.start_date, r.id));
        Ok(hits)
    }

    async fn find_all_for_employee(
        &self,
        employee_id: u64,
    ) -> Result<Vec<LeaveRequest>, StoreError> {
        let mut all: Vec<LeaveRequest> = self
            .requests
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect();
        all.sort_by_key(|r| (r.start_date, r.id));
        Ok(all)
    }

    async fn insert(&self, request: NewLeaveRequest) -> Result<LeaveRequest, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let request = LeaveRequest {
            id,
            employee_id: request.employee_id,
            start_date: request.start_date,
            end_date: request.end_date,
            leave_type: request.leave_type,
            status: LeaveStatus::Pending,
            reason: request.reason,
            created_at: Some(Utc::now()),
        };
        self.requests.lock().unwrap().insert(id, request.clone());
        Ok(request)
    }

    async fn update_status(
        &self,
        request_id: u64,
        status: LeaveStatus,
        reason: Option<&str>,
    ) -> Result<LeaveRequest, StoreError> {
        let mut requests = self.requests.lock().unwrap();
        let request = requests.get_mut(&request_id).ok_or(StoreError::RowNotFound)?;
        request.status = status;
        if let Some(reason) = reason {
            request.reason = reason.to_string();
        }
        Ok(request.clone())
    }
}
