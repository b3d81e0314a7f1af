pub mod list;
pub mod mark;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::attendance::entities::AttendanceDetail;
use crate::models::attendance::requests::MarkAttendanceRequest;
use crate::models::users::entities::{User, UserRole};
use crate::storage::Storage;

pub struct AttendanceService;

impl AttendanceService {
    // 批量考勤
    pub async fn mark_attendance(
        &self,
        request: &HttpRequest,
        body: MarkAttendanceRequest,
    ) -> ActixResult<HttpResponse> {
        mark::mark_attendance(request, body).await
    }

    // 学生：自己的考勤；教师：所教班级的考勤
    pub async fn list_attendance(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_attendance(request).await
    }

    // 按班级汇总出勤率
    pub async fn attendance_summary(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::attendance_summary(request).await
    }
}

/// 当前用户可见的考勤记录
pub(crate) async fn visible_records(
    storage: &Arc<dyn Storage>,
    user: &User,
) -> Result<Vec<AttendanceDetail>> {
    match user.role {
        UserRole::Student => storage.list_attendance_by_student(user.id).await,
        UserRole::Teacher => storage.list_attendance_by_teacher(user.id).await,
    }
}
