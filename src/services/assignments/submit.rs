use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::load_assignment;
use crate::models::assignments::requests::SubmitAssignmentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{
    Reply, bad_request, current_user, forbidden, get_storage, respond, storage_error,
};

pub async fn submit_assignment(
    request: &HttpRequest,
    assignment_id: i64,
    body: SubmitAssignmentRequest,
) -> ActixResult<HttpResponse> {
    respond(submit(request, assignment_id, body).await)
}

async fn submit(request: &HttpRequest, assignment_id: i64, body: SubmitAssignmentRequest) -> Reply {
    let user = current_user(request)?;
    let storage = get_storage(request)?;

    if body.content.trim().is_empty() {
        return Err(bad_request(
            ErrorCode::SubmissionFailed,
            "Submission content is required",
        ));
    }

    let assignment = load_assignment(&storage, assignment_id).await?;

    let enrolled = storage
        .is_student_enrolled(assignment.class_id, user.id)
        .await
        .map_err(|e| storage_error(ErrorCode::SubmissionFailed, "Failed to submit", e))?;
    if !enrolled {
        return Err(forbidden(
            ErrorCode::StudentNotEnrolled,
            "You are not enrolled in this class",
        ));
    }

    let saved = storage
        .upsert_submission(assignment_id, user.id, &body.content)
        .await
        .map_err(|e| storage_error(ErrorCode::SubmissionFailed, "Failed to submit", e))?;

    info!(
        "Student {} submitted assignment {} (submission {}, new: {})",
        user.id, assignment_id, saved.submission.id, saved.created
    );

    if saved.created {
        Ok(HttpResponse::Created().json(ApiResponse::success(
            saved.submission,
            "Submission created successfully",
        )))
    } else {
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            saved.submission,
            "Submission updated successfully",
        )))
    }
}
