use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::load_owned_class;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{Reply, current_user, get_storage, not_found, respond, storage_error};

pub async fn delete_class(request: &HttpRequest, class_id: i64) -> ActixResult<HttpResponse> {
    respond(delete(request, class_id).await)
}

async fn delete(request: &HttpRequest, class_id: i64) -> Reply {
    let user = current_user(request)?;
    let storage = get_storage(request)?;

    load_owned_class(&storage, class_id, &user).await?;

    let deleted = storage
        .delete_class(class_id)
        .await
        .map_err(|e| storage_error(ErrorCode::ClassDeleteFailed, "Failed to delete class", e))?;
    if !deleted {
        return Err(not_found(ErrorCode::ClassNotFound, "Class not found"));
    }

    info!("Class {} deleted by {}", class_id, user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Class deleted successfully")))
}
