use super::entities::UserRole;
use serde::Deserialize;
use ts_rs::TS;

// 用户创建请求（注册）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}
