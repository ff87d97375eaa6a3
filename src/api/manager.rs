use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::response;
use crate::store::{ManagerStore, UserStore};

#[derive(Deserialize, ToSchema)]
pub struct CreateManagerPair {
    #[serde(rename = "userID")]
    #[schema(example = 1000)]
    pub user_id: u64,
    #[serde(rename = "managerID")]
    #[schema(example = 2000)]
    pub manager_id: u64,
}

/// List manager pairs
#[utoipa::path(
    get,
    path = "/api/managers",
    responses(
        (status = 200, description = "All manager-employee pairs"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Manager"
)]
pub async fn list_manager_pairs(
    auth: AuthUser,
    managers: web::Data<dyn ManagerStore>,
) -> actix_web::Result<HttpResponse> {
    auth.require_manager_or_admin()?;

    let pairs = managers.find_all().await.map_err(AppError::from)?;
    Ok(response::ok(pairs))
}

/// Get the manager pair for an employee
#[utoipa::path(
    get,
    path = "/api/managers/{userID}",
    params(("userID" = u64, Path, description = "Employee user ID")),
    responses(
        (status = 200, description = "Manager pair found"),
        (status = 400, description = "No manager for this user"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Manager"
)]
pub async fn get_manager_pair(
    _auth: AuthUser,
    managers: web::Data<dyn ManagerStore>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    let user_id = path.into_inner();
    let pair = managers
        .find_by_user(user_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound(format!("Manager for user ID: {user_id} not found")))?;
    Ok(response::ok(pair))
}

/// Create manager pair
#[utoipa::path(
    post,
    path = "/api/managers",
    request_body = CreateManagerPair,
    responses(
        (status = 201, description = "Pair created"),
        (status = 400, description = "Unknown user or duplicate pair"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Manager"
)]
pub async fn create_manager_pair(
    auth: AuthUser,
    managers: web::Data<dyn ManagerStore>,
    users: web::Data<dyn UserStore>,
    payload: web::Json<CreateManagerPair>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;

    // Both ends of the pair must reference existing users.
    for id in [payload.user_id, payload.manager_id] {
        if users
            .find_by_id(id)
            .await
            .map_err(AppError::from)?
            .is_none()
        {
            return Err(AppError::UserNotFound(id).into());
        }
    }

    let pair = managers
        .insert(payload.user_id, payload.manager_id)
        .await
        .map_err(AppError::from)?;
    Ok(response::created(pair))
}

/// Reassign an employee's manager
#[utoipa::path(
    patch,
    path = "/api/managers",
    request_body = CreateManagerPair,
    responses(
        (status = 200, description = "Pair updated"),
        (status = 400, description = "No pair for this user"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Manager"
)]
pub async fn update_manager_pair(
    auth: AuthUser,
    managers: web::Data<dyn ManagerStore>,
    users: web::Data<dyn UserStore>,
    payload: web::Json<CreateManagerPair>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;

    if users
        .find_by_id(payload.manager_id)
        .await
        .map_err(AppError::from)?
        .is_none()
    {
        return Err(AppError::UserNotFound(payload.manager_id).into());
    }

    let pair = managers
        .update_manager(payload.user_id, payload.manager_id)
        .await
        .map_err(|e| match e {
            crate::store::StoreError::RowNotFound => {
                AppError::NotFound("Manager could not be found for user".to_string())
            }
            other => AppError::from(other),
        })?;
    Ok(response::ok(pair))
}

/// Delete manager pair
#[utoipa::path(
    delete,
    path = "/api/managers/{id}",
    params(("id" = u64, Path, description = "Manager pair ID")),
    responses(
        (status = 200, description = "Pair deleted"),
        (status = 400, description = "Pair not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Manager"
)]
pub async fn delete_manager_pair(
    auth: AuthUser,
    managers: web::Data<dyn ManagerStore>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;

    let pair_id = path.into_inner();
    let deleted = managers.delete(pair_id).await.map_err(AppError::from)?;
    if !deleted {
        return Err(
            AppError::NotFound("Manager pair with the provided ID not found".to_string()).into(),
        );
    }
    Ok(response::ok("Manager Pair Deleted"))
}
