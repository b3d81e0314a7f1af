use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{load_class_detail, load_owned_class};
use crate::models::classes::requests::UpdateClassRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{Reply, bad_request, current_user, get_storage, respond, storage_error};
use crate::utils::validate::require_text;

pub async fn update_class(
    request: &HttpRequest,
    class_id: i64,
    update_data: UpdateClassRequest,
) -> ActixResult<HttpResponse> {
    respond(update(request, class_id, update_data).await)
}

async fn update(request: &HttpRequest, class_id: i64, mut update_data: UpdateClassRequest) -> Reply {
    let user = current_user(request)?;
    let storage = get_storage(request)?;

    load_owned_class(&storage, class_id, &user).await?;

    // 提供了名称或科目时不能为空
    if let Some(name) = update_data.name.take() {
        update_data.name = Some(
            require_text("Class name", &name)
                .map_err(|msg| bad_request(ErrorCode::BadRequest, msg))?,
        );
    }
    if let Some(subject) = update_data.subject.take() {
        update_data.subject = Some(
            require_text("Subject", &subject)
                .map_err(|msg| bad_request(ErrorCode::BadRequest, msg))?,
        );
    }

    storage
        .update_class(class_id, update_data)
        .await
        .map_err(|e| storage_error(ErrorCode::ClassUpdateFailed, "Failed to update class", e))?;

    let detail = load_class_detail(&storage, class_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "Class updated successfully")))
}
