use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Links an employee to the manager responsible for their leave requests.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct ManagerPair {
    #[schema(example = 1)]
    pub id: u64,
    #[serde(rename = "userID")]
    #[schema(example = 1000)]
    pub user_id: u64,
    #[serde(rename = "managerID")]
    #[schema(example = 2000)]
    pub manager_id: u64,
}
