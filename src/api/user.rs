use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::auth::password::hash_password;
use crate::config::Config;
use crate::error::AppError;
use crate::model::user::{NewUser, validate_profile};
use crate::response;
use crate::store::UserStore;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[schema(example = "John")]
    pub firstname: String,
    #[schema(example = "Doe")]
    pub surname: String,
    #[schema(example = "john.doe@company.com", format = "email")]
    pub email: String,
    #[schema(example = "correct horse battery staple")]
    pub password: String,
    #[serde(rename = "roleID")]
    #[schema(example = 3)]
    pub role_id: u8,
    /// Starting balance; defaults from config when omitted.
    #[schema(example = 25)]
    pub annual_leave_balance: Option<i64>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[serde(rename = "userID")]
    #[schema(example = 1)]
    pub user_id: u64,
    #[schema(example = "John")]
    pub firstname: String,
    #[schema(example = "Doe")]
    pub surname: String,
    #[schema(example = "john.doe@company.com", format = "email")]
    pub email: String,
    #[serde(rename = "roleID")]
    #[schema(example = 3)]
    pub role_id: u8,
}

/// List users
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn list_users(
    auth: AuthUser,
    users: web::Data<dyn UserStore>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;

    let all = users.find_all().await.map_err(AppError::from)?;
    Ok(response::ok(all))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = u64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found"),
        (status = 400, description = "User not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn get_user(
    auth: AuthUser,
    users: web::Data<dyn UserStore>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;

    let user_id = path.into_inner();
    let user = users
        .find_by_id(user_id)
        .await
        .map_err(AppError::from)?
        .ok_or(AppError::UserNotFound(user_id))?;
    Ok(response::ok(user))
}

/// Get user by email
#[utoipa::path(
    get,
    path = "/api/users/email/{emailAddress}",
    params(("emailAddress" = String, Path, description = "Email address")),
    responses(
        (status = 200, description = "User found"),
        (status = 400, description = "User not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn get_user_by_email(
    auth: AuthUser,
    users: web::Data<dyn UserStore>,
    path: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;

    let email = path.into_inner();
    if email.trim().is_empty() {
        return Err(AppError::Validation("Email is required".to_string()).into());
    }
    let user = users
        .find_by_email(&email)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound(format!("{email} not found")))?;
    Ok(response::ok(user))
}

/// Create user
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created"),
        (status = 400, description = "Validation failure or duplicate email"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn create_user(
    auth: AuthUser,
    users: web::Data<dyn UserStore>,
    config: web::Data<Config>,
    payload: web::Json<CreateUser>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;

    let payload = payload.into_inner();
    let raw_password_len = payload.password.chars().count();
    let hashed = hash_password(&payload.password)
        .map_err(|_| actix_web::error::ErrorInternalServerError("Failed to hash password"))?;

    let new_user = NewUser {
        firstname: payload.firstname,
        surname: payload.surname,
        email: payload.email,
        password: hashed,
        role_id: payload.role_id,
        annual_leave_balance: payload
            .annual_leave_balance
            .unwrap_or(config.default_annual_leave),
    };

    let violations = new_user.validate(raw_password_len);
    if !violations.is_empty() {
        return Err(AppError::Validation(violations.join(", ")).into());
    }

    let created = users.insert(new_user).await.map_err(AppError::from)?;
    Ok(response::created(created))
}

/// Update user profile
#[utoipa::path(
    patch,
    path = "/api/users",
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated"),
        (status = 400, description = "Validation failure or unknown user"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn update_user(
    auth: AuthUser,
    users: web::Data<dyn UserStore>,
    payload: web::Json<UpdateUser>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;

    let payload = payload.into_inner();
    let mut user = users
        .find_by_id(payload.user_id)
        .await
        .map_err(AppError::from)?
        .ok_or(AppError::UserNotFound(payload.user_id))?;

    user.firstname = payload.firstname;
    user.surname = payload.surname;
    user.email = payload.email;
    user.role_id = payload.role_id;

    let violations = validate_profile(&user.firstname, &user.surname, &user.email, user.role_id);
    if !violations.is_empty() {
        return Err(AppError::Validation(violations.join(", ")).into());
    }

    let updated = users.update(&user).await.map_err(AppError::from)?;
    Ok(response::ok(updated))
}

/// Delete user
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = u64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 400, description = "User not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn delete_user(
    auth: AuthUser,
    users: web::Data<dyn UserStore>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;

    let user_id = path.into_inner();
    let deleted = users.delete(user_id).await.map_err(AppError::from)?;
    if !deleted {
        return Err(AppError::UserNotFound(user_id).into());
    }
    Ok(response::ok("User Deleted"))
}
