use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::classes::responses::ClassListResponse;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{Reply, current_user, get_storage, respond, storage_error};

pub async fn list_classes(request: &HttpRequest) -> ActixResult<HttpResponse> {
    respond(list(request).await)
}

async fn list(request: &HttpRequest) -> Reply {
    let user = current_user(request)?;
    let storage = get_storage(request)?;

    let result = match user.role {
        UserRole::Teacher => storage.list_classes_by_teacher(user.id).await,
        UserRole::Student => storage.list_classes_by_student(user.id).await,
    };
    let items = result
        .map_err(|e| storage_error(ErrorCode::InternalServerError, "Failed to list classes", e))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ClassListResponse { items },
        "Classes retrieved successfully",
    )))
}
