pub mod create;
pub mod delete;
pub mod grade;
pub mod list;
pub mod submit;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::assignments::entities::{Assignment, AssignmentDetail, SubmissionVisibility};
use crate::models::assignments::requests::{
    CreateAssignmentRequest, GradeSubmissionRequest, SubmitAssignmentRequest,
    UpdateAssignmentRequest,
};
use crate::models::users::entities::User;
use crate::services::{bad_request, not_found, not_owner, storage_error};
use crate::storage::Storage;
use crate::utils::parse_date;

pub struct AssignmentService;

impl AssignmentService {
    // 教师：自己布置的作业；学生：所在班级的作业
    pub async fn list_assignments(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_assignments(request).await
    }

    pub async fn list_assignments_by_class(
        &self,
        request: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_assignments_by_class(request, class_id).await
    }

    pub async fn create_assignment(
        &self,
        request: &HttpRequest,
        body: CreateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_assignment(request, body).await
    }

    pub async fn update_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        body: UpdateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_assignment(request, assignment_id, body).await
    }

    pub async fn delete_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_assignment(request, assignment_id).await
    }

    // 学生提交或重新提交
    pub async fn submit_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        body: SubmitAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_assignment(request, assignment_id, body).await
    }

    pub async fn grade_submission(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        submission_id: i64,
        body: GradeSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        grade::grade_submission(request, assignment_id, submission_id, body).await
    }
}

pub(crate) async fn load_assignment(
    storage: &Arc<dyn Storage>,
    assignment_id: i64,
) -> Result<Assignment, HttpResponse> {
    storage
        .get_assignment_by_id(assignment_id)
        .await
        .map_err(|e| storage_error(ErrorCode::AssignmentNotFound, "Failed to load assignment", e))?
        .ok_or_else(|| not_found(ErrorCode::AssignmentNotFound, "Assignment not found"))
}

/// 不存在 404，不是布置者 401
pub(crate) async fn load_owned_assignment(
    storage: &Arc<dyn Storage>,
    assignment_id: i64,
    user: &User,
) -> Result<Assignment, HttpResponse> {
    let assignment = load_assignment(storage, assignment_id).await?;
    if assignment.teacher_id != user.id {
        tracing::info!(
            "User {} attempted to modify assignment {} owned by {}",
            user.id,
            assignment.id,
            assignment.teacher_id
        );
        return Err(not_owner(
            ErrorCode::AssignmentPermissionDenied,
            "You are not the teacher of this assignment",
        ));
    }
    Ok(assignment)
}

pub(crate) async fn load_assignment_detail(
    storage: &Arc<dyn Storage>,
    assignment_id: i64,
    visibility: SubmissionVisibility,
) -> Result<AssignmentDetail, HttpResponse> {
    storage
        .get_assignment_detail(assignment_id, visibility)
        .await
        .map_err(|e| storage_error(ErrorCode::AssignmentNotFound, "Failed to load assignment", e))?
        .ok_or_else(|| not_found(ErrorCode::AssignmentNotFound, "Assignment not found"))
}

pub(crate) fn parse_due_date(raw: &str) -> Result<chrono::DateTime<chrono::Utc>, HttpResponse> {
    parse_date(raw).map_err(|e| bad_request(ErrorCode::BadRequest, format!("Invalid due date: {}", e.message())))
}
