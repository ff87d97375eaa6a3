use utoipa::OpenApi;

use crate::api::leave_request::{
    ApproveLeave, CancelLeave, LeaveStatusEntry, RejectLeave, SubmitLeave,
};
use crate::api::manager::CreateManagerPair;
use crate::api::user::{CreateUser, UpdateUser};
use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::model::manager::ManagerPair;
use crate::model::user::User;
use crate::models::LoginReq;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LeaveDesk API",
        version = "1.0.0",
        description = r#"
## Employee Leave Management

This API powers an employee leave-management system.

### 🔹 Key Features
- **Leave Requests**
  - Submit, cancel, approve and reject leave; query status and remaining balance
- **User Management**
  - Create, update, list and delete users (admin)
- **Manager Pairs**
  - Link employees to the managers who approve their leave

### 🔐 Security
Endpoints under `/api` are protected using **JWT Bearer authentication**.
Approving and rejecting leave requires a **Manager** or **Admin** role.

### 📦 Response Format
- Success responses are wrapped in `{"data": ...}`
- Failures use `{"error": {"message", "status", "timestamp"}}`

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::login,

        crate::api::leave_request::submit_leave,
        crate::api::leave_request::cancel_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,
        crate::api::leave_request::leave_status,
        crate::api::leave_request::leave_balance,

        crate::api::user::list_users,
        crate::api::user::get_user,
        crate::api::user::get_user_by_email,
        crate::api::user::create_user,
        crate::api::user::update_user,
        crate::api::user::delete_user,

        crate::api::manager::list_manager_pairs,
        crate::api::manager::get_manager_pair,
        crate::api::manager::create_manager_pair,
        crate::api::manager::update_manager_pair,
        crate::api::manager::delete_manager_pair
    ),
    components(
        schemas(
            LoginReq,
            LeaveRequest,
            LeaveStatus,
            LeaveStatusEntry,
            SubmitLeave,
            CancelLeave,
            ApproveLeave,
            RejectLeave,
            User,
            CreateUser,
            UpdateUser,
            ManagerPair,
            CreateManagerPair
        )
    ),
    tags(
        (name = "Auth", description = "Sign-in APIs"),
        (name = "Leave", description = "Leave request lifecycle APIs"),
        (name = "User", description = "User management APIs"),
        (name = "Manager", description = "Manager pair APIs"),
    )
)]
pub struct ApiDoc;
