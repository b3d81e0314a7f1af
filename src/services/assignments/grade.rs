use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::load_owned_assignment;
use crate::models::assignments::requests::GradeSubmissionRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{Reply, bad_request, current_user, get_storage, not_found, respond, storage_error};

const MAX_GRADE: f64 = 100.0;

pub async fn grade_submission(
    request: &HttpRequest,
    assignment_id: i64,
    submission_id: i64,
    body: GradeSubmissionRequest,
) -> ActixResult<HttpResponse> {
    respond(grade(request, assignment_id, submission_id, body).await)
}

fn is_valid_grade(grade: f64) -> bool {
    (0.0..=MAX_GRADE).contains(&grade)
}

async fn grade(
    request: &HttpRequest,
    assignment_id: i64,
    submission_id: i64,
    body: GradeSubmissionRequest,
) -> Reply {
    let user = current_user(request)?;
    let storage = get_storage(request)?;

    load_owned_assignment(&storage, assignment_id, &user).await?;

    let submission_missing = || not_found(ErrorCode::SubmissionNotFound, "Submission not found");
    let submission = storage
        .get_submission_by_id(submission_id)
        .await
        .map_err(|e| storage_error(ErrorCode::SubmissionNotFound, "Failed to load submission", e))?
        .filter(|s| s.assignment_id == assignment_id)
        .ok_or_else(submission_missing)?;

    if !is_valid_grade(body.grade) {
        return Err(bad_request(
            ErrorCode::GradeInvalid,
            "Grade must be between 0 and 100",
        ));
    }

    let graded = storage
        .grade_submission(submission.id, body.grade, body.feedback)
        .await
        .map_err(|e| storage_error(ErrorCode::InternalServerError, "Failed to grade submission", e))?
        .ok_or_else(submission_missing)?;

    info!(
        "Submission {} graded {} by {}",
        graded.id, graded.grade.unwrap_or_default(), user.id
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(graded, "Submission graded successfully")))
}
