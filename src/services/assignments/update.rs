use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{load_assignment_detail, load_owned_assignment, parse_due_date};
use crate::models::assignments::entities::SubmissionVisibility;
use crate::models::assignments::requests::{AssignmentChanges, UpdateAssignmentRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{Reply, bad_request, current_user, get_storage, respond, storage_error};
use crate::utils::validate::require_text;

pub async fn update_assignment(
    request: &HttpRequest,
    assignment_id: i64,
    body: UpdateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    respond(update(request, assignment_id, body).await)
}

async fn update(request: &HttpRequest, assignment_id: i64, body: UpdateAssignmentRequest) -> Reply {
    let user = current_user(request)?;
    let storage = get_storage(request)?;

    load_owned_assignment(&storage, assignment_id, &user).await?;

    let changes = AssignmentChanges {
        title: body
            .title
            .map(|t| require_text("Title", &t))
            .transpose()
            .map_err(|msg| bad_request(ErrorCode::BadRequest, msg))?,
        description: body.description,
        due_date: body.due_date.as_deref().map(parse_due_date).transpose()?,
    };

    storage
        .update_assignment(assignment_id, changes)
        .await
        .map_err(|e| {
            storage_error(
                ErrorCode::AssignmentUpdateFailed,
                "Failed to update assignment",
                e,
            )
        })?;

    let detail = load_assignment_detail(&storage, assignment_id, SubmissionVisibility::All).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        detail,
        "Assignment updated successfully",
    )))
}
