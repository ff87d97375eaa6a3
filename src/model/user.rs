use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::role::Role;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "userID")]
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "John")]
    pub firstname: String,
    #[schema(example = "Doe")]
    pub surname: String,
    #[schema(example = "john.doe@company.com")]
    pub email: String,
    /// Argon2 hash; never leaves the backend.
    #[serde(skip)]
    pub password: String,
    #[serde(rename = "roleID")]
    #[schema(example = 3)]
    pub role_id: u8,
    #[schema(example = 25)]
    pub annual_leave_balance: i64,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub firstname: String,
    pub surname: String,
    pub email: String,
    /// Already hashed by the caller.
    pub password: String,
    pub role_id: u8,
    pub annual_leave_balance: i64,
}

/// Field-level checks shared by create and update. Returns every violation,
/// not just the first, so the caller can report them all at once.
pub fn validate_profile(firstname: &str, surname: &str, email: &str, role_id: u8) -> Vec<String> {
    let mut violations = Vec::new();

    if firstname.trim().is_empty() {
        violations.push("First name is required".to_string());
    } else if firstname.chars().count() > 30 {
        violations.push("First name cannot exceed 30 characters".to_string());
    }

    if surname.trim().is_empty() {
        violations.push("Surname is required".to_string());
    } else if surname.chars().count() > 30 {
        violations.push("Surname cannot exceed 30 characters".to_string());
    }

    if !email.contains('@') || email.trim().is_empty() {
        violations.push("Must be a valid email address".to_string());
    }

    if Role::from_id(role_id).is_none() {
        violations.push("Invalid role - not specified in backend program".to_string());
    }

    violations
}

impl NewUser {
    /// Violations for a user about to be created. `raw_password_len` is the
    /// length of the password before hashing.
    pub fn validate(&self, raw_password_len: usize) -> Vec<String> {
        let mut violations =
            validate_profile(&self.firstname, &self.surname, &self.email, self.role_id);
        if raw_password_len < 10 {
            violations.push("Password must be atleast 10 characters long".to_string());
        }
        violations
    }
}
