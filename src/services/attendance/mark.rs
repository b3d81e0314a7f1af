use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::attendance::responses::AttendanceListResponse;
use crate::models::attendance::requests::{
    AttendanceRecordInput, MarkAttendanceRequest, NewAttendanceRecord,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{Reply, bad_request, current_user, get_storage, respond, storage_error};
use crate::utils::parse_date;

const MISSING_FIELDS: &str = "Each attendance record must have student, class, status, and date";

pub async fn mark_attendance(
    request: &HttpRequest,
    body: MarkAttendanceRequest,
) -> ActixResult<HttpResponse> {
    respond(mark(request, body).await)
}

/// 校验单条记录，任何字段缺失或日期无法解析都返回错误信息
fn validate_record(index: usize, input: AttendanceRecordInput) -> Result<NewAttendanceRecord, String> {
    let (Some(student_id), Some(class_id), Some(status), Some(date)) =
        (input.student_id, input.class_id, input.status, input.date)
    else {
        return Err(format!("{MISSING_FIELDS} (record {index})"));
    };

    let date = parse_date(&date).map_err(|e| format!("Record {index}: {}", e.message()))?;

    Ok(NewAttendanceRecord {
        student_id,
        class_id,
        date,
        status,
    })
}

async fn mark(request: &HttpRequest, body: MarkAttendanceRequest) -> Reply {
    let user = current_user(request)?;
    let storage = get_storage(request)?;

    // 先整体校验，保证不会部分写入
    let records = body
        .attendance_records
        .into_iter()
        .enumerate()
        .map(|(index, input)| validate_record(index, input))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|msg| bad_request(ErrorCode::AttendanceInvalid, msg))?;

    let count = records.len();
    let created = storage
        .mark_attendance(records)
        .await
        .map_err(|e| storage_error(ErrorCode::AttendanceMarkFailed, "Failed to mark attendance", e))?;

    info!("User {} marked {} attendance records", user.id, count);
    Ok(HttpResponse::Created().json(ApiResponse::success(
        AttendanceListResponse { items: created },
        "Attendance marked successfully",
    )))
}
