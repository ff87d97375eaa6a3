use actix_web::{HttpResponse, web};
use serde_json::json;
use tracing::{debug, info, instrument};

use crate::auth::jwt::generate_token;
use crate::auth::password::verify_password;
use crate::config::Config;
use crate::error::AppError;
use crate::models::LoginReq;
use crate::store::UserStore;

/// Swagger doc for the login endpoint
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginReq,
    responses(
        (status = 202, description = "Signed in; body carries the bearer token"),
        (status = 400, description = "Missing or incorrect credentials")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(users, config, payload), fields(email = %payload.email))]
pub async fn login(
    payload: web::Json<LoginReq>,
    users: web::Data<dyn UserStore>,
    config: web::Data<Config>,
) -> actix_web::Result<HttpResponse> {
    info!("Login request received");

    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("No email provided".to_string()).into());
    }
    if payload.password.trim().is_empty() {
        return Err(AppError::Validation("No password provided".to_string()).into());
    }

    debug!("Fetching user from database");

    let user = users
        .find_by_email(&payload.email)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::Validation("User not found".to_string()))?;

    debug!(user_id = user.id, "User found, verifying password");

    if verify_password(&payload.password, &user.password).is_err() {
        info!("Invalid credentials: password mismatch");
        return Err(AppError::Validation("Password incorrect".to_string()).into());
    }

    let token = generate_token(
        user.id,
        user.email.clone(),
        user.role_id,
        &config.jwt_secret,
        config.token_ttl,
    )
    .map_err(actix_web::error::ErrorInternalServerError)?;

    info!(user_id = user.id, "Login successful");

    Ok(HttpResponse::Accepted().json(json!({ "token": token })))
}
