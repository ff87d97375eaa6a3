use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct LoginReq {
    #[schema(example = "john.doe@company.com")]
    pub email: String,
    #[schema(example = "correct horse battery staple")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    /// Email address of the signed-in user.
    pub sub: String,
    /// Role id, resolved to a Role on every request.
    pub role: u8,
    pub exp: usize,
    pub jti: String,
}
