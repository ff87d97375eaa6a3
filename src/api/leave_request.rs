use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::response;
use crate::service::leave::LeaveRequestService;

fn default_leave_type() -> String {
    "Annual Leave".to_string()
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitLeave {
    #[serde(rename = "userID")]
    #[schema(example = 1000)]
    pub user_id: u64,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[serde(default = "default_leave_type")]
    #[schema(example = "Annual Leave")]
    pub leave_type: String,
    #[serde(default)]
    #[schema(example = "Family holiday")]
    pub reason: String,
}

#[derive(Deserialize, ToSchema)]
pub struct CancelLeave {
    #[serde(rename = "userID")]
    #[schema(example = 1000)]
    pub user_id: u64,
    #[serde(rename = "leaveRequestID")]
    #[schema(example = 1)]
    pub leave_request_id: u64,
}

#[derive(Deserialize, ToSchema)]
pub struct ApproveLeave {
    #[serde(rename = "userID")]
    #[schema(example = 1000)]
    pub user_id: u64,
    #[serde(rename = "leaveRequestID")]
    #[schema(example = 1)]
    pub leave_request_id: u64,
    #[schema(example = "Enjoy your holiday")]
    pub reason: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct RejectLeave {
    #[serde(rename = "userID")]
    #[schema(example = 1000)]
    pub user_id: u64,
    #[serde(rename = "leaveRequestID")]
    #[schema(example = 1)]
    pub leave_request_id: u64,
    #[serde(default)]
    #[schema(example = "Too many people already off that week")]
    pub reason: String,
}

/// Per-request projection returned by the status endpoint.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveStatusEntry {
    #[serde(rename = "leaveRequestID")]
    pub id: u64,
    #[schema(value_type = String, format = "date")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = "date")]
    pub end_date: NaiveDate,
    pub status: LeaveStatus,
    pub reason: String,
}

impl From<LeaveRequest> for LeaveStatusEntry {
    fn from(request: LeaveRequest) -> Self {
        Self {
            id: request.id,
            start_date: request.start_date,
            end_date: request.end_date,
            status: request.status,
            reason: request.reason,
        }
    }
}

/* =========================
Submit leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/leave-requests",
    request_body(
        content = SubmitLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request created", body = LeaveRequest),
        (status = 400, description = "Validation failure, insufficient balance or overlapping dates"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn submit_leave(
    _auth: AuthUser,
    service: web::Data<LeaveRequestService>,
    payload: web::Json<SubmitLeave>,
) -> actix_web::Result<HttpResponse> {
    let payload = payload.into_inner();
    let created = service
        .submit(
            payload.user_id,
            payload.start_date,
            payload.end_date,
            payload.leave_type,
            payload.reason,
        )
        .await?;
    Ok(response::created(created))
}

/* =========================
Cancel leave request
========================= */
#[utoipa::path(
    delete,
    path = "/api/leave-requests",
    request_body = CancelLeave,
    responses(
        (status = 200, description = "Request cancelled; balance credited if it was approved", body = LeaveRequest),
        (status = 400, description = "Unknown request or already in a terminal state"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn cancel_leave(
    _auth: AuthUser,
    service: web::Data<LeaveRequestService>,
    payload: web::Json<CancelLeave>,
) -> actix_web::Result<HttpResponse> {
    let updated = service
        .cancel(payload.user_id, payload.leave_request_id)
        .await?;
    Ok(response::ok(updated))
}

/* =========================
Approve leave (Manager/Admin)
========================= */
#[utoipa::path(
    patch,
    path = "/api/leave-requests/approve",
    request_body = ApproveLeave,
    responses(
        (status = 200, description = "Request approved and balance debited", body = LeaveRequest),
        (status = 400, description = "Unknown request, not pending, or balance exceeded"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    service: web::Data<LeaveRequestService>,
    payload: web::Json<ApproveLeave>,
) -> actix_web::Result<HttpResponse> {
    auth.require_manager_or_admin()?;

    let payload = payload.into_inner();
    let updated = service
        .approve(payload.user_id, payload.leave_request_id, payload.reason)
        .await?;
    Ok(response::ok(updated))
}

/* =========================
Reject leave (Manager/Admin)
========================= */
#[utoipa::path(
    patch,
    path = "/api/leave-requests/reject",
    request_body = RejectLeave,
    responses(
        (status = 200, description = "Request rejected", body = LeaveRequest),
        (status = 400, description = "Unknown request, not pending, or missing reason"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    service: web::Data<LeaveRequestService>,
    payload: web::Json<RejectLeave>,
) -> actix_web::Result<HttpResponse> {
    auth.require_manager_or_admin()?;

    let updated = service
        .reject(payload.user_id, payload.leave_request_id, &payload.reason)
        .await?;
    Ok(response::ok(updated))
}

/* =========================
Leave status per employee
========================= */
#[utoipa::path(
    get,
    path = "/api/leave-requests/status/{userID}",
    params(("userID" = u64, Path, description = "Employee user ID")),
    responses(
        (status = 200, description = "Requests ordered by start date", body = [LeaveStatusEntry]),
        (status = 400, description = "Employee has no leave requests"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_status(
    _auth: AuthUser,
    service: web::Data<LeaveRequestService>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    let employee_id = path.into_inner();
    let requests = service.status_for(employee_id).await?;
    let entries: Vec<LeaveStatusEntry> = requests.into_iter().map(Into::into).collect();
    Ok(response::ok(entries))
}

/* =========================
Remaining balance per employee
========================= */
#[utoipa::path(
    get,
    path = "/api/leave-requests/remaining/{userID}",
    params(("userID" = u64, Path, description = "Employee user ID")),
    responses(
        (status = 200, description = "Remaining leave balance", body = Object,
         example = json!({"data": {"leaveBalance": 25}})),
        (status = 400, description = "User not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_balance(
    _auth: AuthUser,
    service: web::Data<LeaveRequestService>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    let employee_id = path.into_inner();
    let balance = service.balance_for(employee_id).await?;
    Ok(response::ok(json!({ "leaveBalance": balance })))
}
