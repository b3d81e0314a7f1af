use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{load_class_detail, load_owned_class};
use crate::models::classes::requests::AddStudentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{Reply, current_user, get_storage, not_found, respond, storage_error};

pub async fn add_student(
    request: &HttpRequest,
    class_id: i64,
    body: AddStudentRequest,
) -> ActixResult<HttpResponse> {
    respond(add(request, class_id, body).await)
}

async fn add(request: &HttpRequest, class_id: i64, body: AddStudentRequest) -> Reply {
    let user = current_user(request)?;
    let storage = get_storage(request)?;

    let email = body.email.trim().to_lowercase();
    let student = storage
        .get_user_by_email(&email)
        .await
        .map_err(|e| storage_error(ErrorCode::StudentNotFound, "Failed to look up student", e))?
        .filter(|u| u.role.is_student())
        .ok_or_else(|| not_found(ErrorCode::StudentNotFound, "Student not found"))?;

    load_owned_class(&storage, class_id, &user).await?;

    if let Err(e) = storage.add_student_to_class(class_id, student.id).await {
        if e.is_unique_violation() {
            return Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::StudentAlreadyEnrolled,
                "Student is already enrolled in this class",
            )));
        }
        return Err(storage_error(ErrorCode::ClassUpdateFailed, "Failed to add student", e));
    }

    info!("Student {} added to class {}", student.id, class_id);
    let detail = load_class_detail(&storage, class_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "Student added successfully")))
}

pub async fn remove_student(
    request: &HttpRequest,
    class_id: i64,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    respond(remove(request, class_id, student_id).await)
}

async fn remove(request: &HttpRequest, class_id: i64, student_id: i64) -> Reply {
    let user = current_user(request)?;
    let storage = get_storage(request)?;

    load_owned_class(&storage, class_id, &user).await?;

    // 学生不在班级中时静默成功
    let removed = storage
        .remove_student_from_class(class_id, student_id)
        .await
        .map_err(|e| storage_error(ErrorCode::ClassUpdateFailed, "Failed to remove student", e))?;
    if removed {
        info!("Student {} removed from class {}", student_id, class_id);
    }

    let detail = load_class_detail(&storage, class_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "Student removed successfully")))
}
