use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::visible_records;
use crate::models::attendance::entities::summarize_by_class;
use crate::models::attendance::responses::{AttendanceListResponse, AttendanceSummaryResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{Reply, current_user, get_storage, respond, storage_error};

pub async fn list_attendance(request: &HttpRequest) -> ActixResult<HttpResponse> {
    respond(list(request).await)
}

async fn list(request: &HttpRequest) -> Reply {
    let user = current_user(request)?;
    let storage = get_storage(request)?;

    let items = visible_records(&storage, &user).await.map_err(|e| {
        storage_error(ErrorCode::AttendanceFetchFailed, "Failed to fetch attendance", e)
    })?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AttendanceListResponse { items },
        "Attendance retrieved successfully",
    )))
}

pub async fn attendance_summary(request: &HttpRequest) -> ActixResult<HttpResponse> {
    respond(summary(request).await)
}

async fn summary(request: &HttpRequest) -> Reply {
    let user = current_user(request)?;
    let storage = get_storage(request)?;

    let records = visible_records(&storage, &user).await.map_err(|e| {
        storage_error(ErrorCode::AttendanceFetchFailed, "Failed to fetch attendance", e)
    })?;

    let items = summarize_by_class(
        records
            .iter()
            .map(|detail| (&detail.record, detail.class.name.as_str())),
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AttendanceSummaryResponse { items },
        "Attendance summary retrieved successfully",
    )))
}
