pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod classes;

pub use assignments::AssignmentService;
pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use classes::ClassService;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;
use tracing::error;

use crate::errors::SchoolError;
use crate::middlewares::RequireJWT;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 处理程序内部结果：错误分支同样是一个完整的 HTTP 响应
pub(crate) type Reply = Result<HttpResponse, HttpResponse>;

pub(crate) fn respond(reply: Reply) -> ActixResult<HttpResponse> {
    Ok(reply.unwrap_or_else(|response| response))
}

pub(crate) fn get_storage(request: &HttpRequest) -> Result<Arc<dyn Storage>, HttpResponse> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            error!("Storage not found in app data");
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "Storage unavailable",
            ))
        })
}

/// RequireJWT 放入请求扩展的当前用户
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        ))
    })
}

pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn not_found(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

/// 已登录但不是资源的所有者
pub(crate) fn not_owner(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn forbidden(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(code, message))
}

/// 存储层错误：唯一约束冲突 409，外键引用缺失 400，其余 500
pub(crate) fn storage_error(code: ErrorCode, context: &str, err: SchoolError) -> HttpResponse {
    if err.is_unique_violation() {
        return HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::Conflict,
            format!("{context}: resource already exists"),
        ));
    }
    if err.is_foreign_key_violation() {
        return bad_request(
            ErrorCode::BadRequest,
            format!("{context}: referenced resource does not exist"),
        );
    }

    error!("{}: {}", context, err);
    HttpResponse::InternalServerError().json(ApiResponse::server_error(code, context, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_storage_error_status_mapping() {
        let conflict = storage_error(
            ErrorCode::ClassCreationFailed,
            "Failed to add student",
            SchoolError::conflict("duplicate"),
        );
        assert_eq!(conflict.status(), StatusCode::CONFLICT);

        let failure = storage_error(
            ErrorCode::ClassCreationFailed,
            "Failed to create class",
            SchoolError::database_operation("disk full"),
        );
        assert_eq!(failure.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_respond_unwraps_error_branch() {
        let reply: Reply = Err(not_found(ErrorCode::ClassNotFound, "Class not found"));
        let response = respond(reply).unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
