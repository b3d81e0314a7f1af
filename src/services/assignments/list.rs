use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::assignments::entities::SubmissionVisibility;
use crate::models::assignments::responses::AssignmentListResponse;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{Reply, current_user, get_storage, respond, storage_error};

pub async fn list_assignments(request: &HttpRequest) -> ActixResult<HttpResponse> {
    respond(list(request).await)
}

async fn list(request: &HttpRequest) -> Reply {
    let user = current_user(request)?;
    let storage = get_storage(request)?;

    let result = match user.role {
        UserRole::Teacher => storage.list_assignments_by_teacher(user.id).await,
        UserRole::Student => storage.list_assignments_for_student(user.id).await,
    };
    let items = result.map_err(|e| {
        storage_error(ErrorCode::InternalServerError, "Failed to list assignments", e)
    })?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AssignmentListResponse { items },
        "Assignments retrieved successfully",
    )))
}

pub async fn list_assignments_by_class(
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    respond(list_by_class(request, class_id).await)
}

// 不校验班级归属或选课，提交按角色过滤
async fn list_by_class(request: &HttpRequest, class_id: i64) -> Reply {
    let user = current_user(request)?;
    let storage = get_storage(request)?;

    let items = storage
        .list_assignments_by_class(class_id, SubmissionVisibility::for_user(&user))
        .await
        .map_err(|e| {
            storage_error(ErrorCode::InternalServerError, "Failed to list assignments", e)
        })?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AssignmentListResponse { items },
        "Assignments retrieved successfully",
    )))
}
