use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::middlewares;
use crate::models::attendance::requests::MarkAttendanceRequest;
use crate::services::AttendanceService;

static ATTENDANCE_SERVICE: AttendanceService = AttendanceService;

pub async fn mark_attendance(
    req: HttpRequest,
    body: web::Json<MarkAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .mark_attendance(&req, body.into_inner())
        .await
}

pub async fn list_attendance(req: HttpRequest) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.list_attendance(&req).await
}

pub async fn attendance_summary(req: HttpRequest) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.attendance_summary(&req).await
}

// 配置路由
pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/attendance")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_attendance))
                    .route(web::post().to(mark_attendance)),
            )
            .service(web::resource("/summary").route(web::get().to(attendance_summary))),
    );
}
