use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::MySqlPool;
use sqlx::prelude::FromRow;

use crate::model::leave_request::{LeaveRequest, LeaveStatus, NewLeaveRequest};
use crate::model::manager::ManagerPair;
use crate::model::user::{NewUser, User};
use crate::store::{LeaveRequestStore, ManagerStore, StoreError, UserStore};

const LEAVE_COLUMNS: &str =
    "id, employee_id, start_date, end_date, leave_type, status, reason, created_at";

const USER_COLUMNS: &str =
    "id, firstname, surname, email, password, role_id, annual_leave_balance";

/// Raw row; status is free text in the table and parsed on the way out.
#[derive(FromRow)]
struct LeaveRow {
    id: u64,
    employee_id: u64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    leave_type: String,
    status: String,
    reason: String,
    created_at: Option<DateTime<Utc>>,
}

impl TryFrom<LeaveRow> for LeaveRequest {
    type Error = StoreError;

    fn try_from(row: LeaveRow) -> Result<Self, Self::Error> {
        let status = LeaveStatus::from_str(&row.status)
            .map_err(|_| StoreError::InvalidStatus(row.status.clone()))?;
        Ok(LeaveRequest {
            id: row.id,
            employee_id: row.employee_id,
            start_date: row.start_date,
            end_date: row.end_date,
            leave_type: row.leave_type,
            status,
            reason: row.reason,
            created_at: row.created_at,
        })
    }
}

fn is_duplicate(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23000"),
        _ => false,
    }
}

pub struct MySqlUserStore {
    pool: MySqlPool,
}

impl MySqlUserStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for MySqlUserStore {
    async fn find_by_id(&self, id: u64) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id ASC");
        let users = sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?;
        Ok(users)
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users
                (firstname, surname, email, password, role_id, annual_leave_balance)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.firstname)
        .bind(&user.surname)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.role_id)
        .bind(user.annual_leave_balance)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_duplicate(&e) {
                StoreError::Duplicate(user.email.clone())
            } else {
                tracing::error!(error = %e, "Failed to insert user");
                StoreError::Database(e)
            }
        })?;

        self.find_by_id(result.last_insert_id())
            .await?
            .ok_or(StoreError::RowNotFound)
    }

    async fn update(&self, user: &User) -> Result<User, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET firstname = ?, surname = ?, email = ?, role_id = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.firstname)
        .bind(&user.surname)
        .bind(&user.email)
        .bind(user.role_id)
        .bind(user.id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_duplicate(&e) {
                StoreError::Duplicate(user.email.clone())
            } else {
                StoreError::Database(e)
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RowNotFound);
        }
        self.find_by_id(user.id).await?.ok_or(StoreError::RowNotFound)
    }

    async fn delete(&self, id: u64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn adjust_balance(&self, id: u64, delta_days: i64) -> Result<User, StoreError> {
        // Single conditional UPDATE so the balance check and the write are one
        // statement; the row can never land below zero.
        let result = sqlx::query(
            r#"
            UPDATE users
            SET annual_leave_balance = annual_leave_balance + ?
            WHERE id = ? AND annual_leave_balance + ? >= 0
            "#,
        )
        .bind(delta_days)
        .bind(id)
        .bind(delta_days)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return match self.find_by_id(id).await? {
                Some(_) => Err(StoreError::BalanceExhausted {
                    user_id: id,
                    delta: delta_days,
                }),
                None => Err(StoreError::RowNotFound),
            };
        }

        self.find_by_id(id).await?.ok_or(StoreError::RowNotFound)
    }
}

pub struct MySqlLeaveRequestStore {
    pool: MySqlPool,
}

impl MySqlLeaveRequestStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeaveRequestStore for MySqlLeaveRequestStore {
    async fn find_by_id(
        &self,
        employee_id: u64,
        request_id: u64,
    ) -> Result<Option<LeaveRequest>, StoreError> {
        let sql =
            format!("SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE id = ? AND employee_id = ?");
        let row = sqlx::query_as::<_, LeaveRow>(&sql)
            .bind(request_id)
            .bind(employee_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(LeaveRequest::try_from).transpose()
    }

    async fn find_overlapping(
        &self,
        employee_id: u64,
        start: NaiveDate,
        end: NaiveDate,
        excluded: &[LeaveStatus],
    ) -> Result<Vec<LeaveRequest>, StoreError> {
        // Closed-range overlap: stored.start <= query.end AND stored.end >= query.start
        let mut sql = format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_requests \
             WHERE employee_id = ? AND start_date <= ? AND end_date >= ?"
        );
        if !excluded.is_empty() {
            let placeholders = vec!["?"; excluded.len()].join(", ");
            sql.push_str(&format!(" AND status NOT IN ({placeholders})"));
        }
        sql.push_str(" ORDER BY start_date ASC, id ASC");

        let mut query = sqlx::query_as::<_, LeaveRow>(&sql)
            .bind(employee_id)
            .bind(end)
            .bind(start);
        for status in excluded {
            query = query.bind(status.to_string());
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(LeaveRequest::try_from).collect()
    }

    async fn find_all_for_employee(
        &self,
        employee_id: u64,
    ) -> Result<Vec<LeaveRequest>, StoreError> {
        let sql = format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_requests \
             WHERE employee_id = ? ORDER BY start_date ASC, id ASC"
        );
        let rows = sqlx::query_as::<_, LeaveRow>(&sql)
            .bind(employee_id)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(LeaveRequest::try_from).collect()
    }

    async fn insert(&self, request: NewLeaveRequest) -> Result<LeaveRequest, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO leave_requests
                (employee_id, start_date, end_date, leave_type, status, reason)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(request.employee_id)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(&request.leave_type)
        .bind(LeaveStatus::Pending.to_string())
        .bind(&request.reason)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id = request.employee_id, "Failed to create leave request");
            StoreError::Database(e)
        })?;

        self.find_by_id(request.employee_id, result.last_insert_id())
            .await?
            .ok_or(StoreError::RowNotFound)
    }

    async fn update_status(
        &self,
        request_id: u64,
        status: LeaveStatus,
        reason: Option<&str>,
    ) -> Result<LeaveRequest, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE leave_requests
            SET status = ?, reason = COALESCE(?, reason)
            WHERE id = ?
            "#,
        )
        .bind(status.to_string())
        .bind(reason)
        .bind(request_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RowNotFound);
        }

        let sql = format!("SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE id = ?");
        let row = sqlx::query_as::<_, LeaveRow>(&sql)
            .bind(request_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::RowNotFound)?;
        LeaveRequest::try_from(row)
    }
}

pub struct MySqlManagerStore {
    pool: MySqlPool,
}

impl MySqlManagerStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ManagerStore for MySqlManagerStore {
    async fn find_all(&self) -> Result<Vec<ManagerPair>, StoreError> {
        let pairs = sqlx::query_as::<_, ManagerPair>(
            "SELECT id, user_id, manager_id FROM manager_pairs ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(pairs)
    }

    async fn find_by_user(&self, user_id: u64) -> Result<Option<ManagerPair>, StoreError> {
        let pair = sqlx::query_as::<_, ManagerPair>(
            "SELECT id, user_id, manager_id FROM manager_pairs WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(pair)
    }

    async fn insert(&self, user_id: u64, manager_id: u64) -> Result<ManagerPair, StoreError> {
        let result =
            sqlx::query("INSERT INTO manager_pairs (user_id, manager_id) VALUES (?, ?)")
                .bind(user_id)
                .bind(manager_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    if is_duplicate(&e) {
                        StoreError::Duplicate(format!("manager pair for user {user_id}"))
                    } else {
                        StoreError::Database(e)
                    }
                })?;

        let id = result.last_insert_id();
        self.find_by_id(id).await?.ok_or(StoreError::RowNotFound)
    }

    async fn update_manager(
        &self,
        user_id: u64,
        manager_id: u64,
    ) -> Result<ManagerPair, StoreError> {
        let result = sqlx::query("UPDATE manager_pairs SET manager_id = ? WHERE user_id = ?")
            .bind(manager_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RowNotFound);
        }
        self.find_by_user(user_id).await?.ok_or(StoreError::RowNotFound)
    }

    async fn delete(&self, id: u64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM manager_pairs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl MySqlManagerStore {
    async fn find_by_id(&self, id: u64) -> Result<Option<ManagerPair>, StoreError> {
        let pair = sqlx::query_as::<_, ManagerPair>(
            "SELECT id, user_id, manager_id FROM manager_pairs WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(pair)
    }
}
