use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::load_class_detail;
use crate::models::classes::requests::CreateClassRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{Reply, bad_request, current_user, get_storage, respond, storage_error};
use crate::utils::validate::require_text;

pub async fn create_class(
    request: &HttpRequest,
    class_data: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    respond(create(request, class_data).await)
}

async fn create(request: &HttpRequest, mut class_data: CreateClassRequest) -> Reply {
    let user = current_user(request)?;
    let storage = get_storage(request)?;

    class_data.name = require_text("Class name", &class_data.name)
        .map_err(|msg| bad_request(ErrorCode::BadRequest, msg))?;
    class_data.subject = require_text("Subject", &class_data.subject)
        .map_err(|msg| bad_request(ErrorCode::BadRequest, msg))?;

    let class = storage
        .create_class(user.id, class_data)
        .await
        .map_err(|e| storage_error(ErrorCode::ClassCreationFailed, "Failed to create class", e))?;

    info!("Class {} ({}) created by {}", class.id, class.name, user.id);

    let detail = load_class_detail(&storage, class.id).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(detail, "Class created successfully")))
}
