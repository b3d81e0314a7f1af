use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::load_owned_assignment;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{Reply, current_user, get_storage, not_found, respond, storage_error};

pub async fn delete_assignment(
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    respond(delete(request, assignment_id).await)
}

async fn delete(request: &HttpRequest, assignment_id: i64) -> Reply {
    let user = current_user(request)?;
    let storage = get_storage(request)?;

    load_owned_assignment(&storage, assignment_id, &user).await?;

    let deleted = storage.delete_assignment(assignment_id).await.map_err(|e| {
        storage_error(
            ErrorCode::AssignmentDeleteFailed,
            "Failed to delete assignment",
            e,
        )
    })?;
    if !deleted {
        return Err(not_found(ErrorCode::AssignmentNotFound, "Assignment not found"));
    }

    info!("Assignment {} deleted by {}", assignment_id, user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Assignment deleted successfully")))
}
