use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{load_assignment_detail, parse_due_date};
use crate::models::assignments::entities::SubmissionVisibility;
use crate::models::assignments::requests::{CreateAssignmentRequest, NewAssignment};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::classes::load_owned_class;
use crate::services::{Reply, bad_request, current_user, get_storage, respond, storage_error};
use crate::utils::validate::require_text;

pub async fn create_assignment(
    request: &HttpRequest,
    body: CreateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    respond(create(request, body).await)
}

async fn create(request: &HttpRequest, body: CreateAssignmentRequest) -> Reply {
    let user = current_user(request)?;
    let storage = get_storage(request)?;

    let title = require_text("Title", &body.title)
        .map_err(|msg| bad_request(ErrorCode::BadRequest, msg))?;
    let due_date = parse_due_date(&body.due_date)?;

    // 只能给自己的班级布置作业
    let class = load_owned_class(&storage, body.class_id, &user).await?;

    let assignment = storage
        .create_assignment(NewAssignment {
            class_id: class.id,
            teacher_id: user.id,
            title,
            description: body.description,
            due_date,
        })
        .await
        .map_err(|e| {
            storage_error(
                ErrorCode::AssignmentCreationFailed,
                "Failed to create assignment",
                e,
            )
        })?;

    info!(
        "Assignment {} created in class {} by {}",
        assignment.id, class.id, user.id
    );

    let detail = load_assignment_detail(&storage, assignment.id, SubmissionVisibility::All).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        detail,
        "Assignment created successfully",
    )))
}
