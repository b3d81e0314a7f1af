pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod classes;

pub use assignments::configure_assignments_routes;
pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use classes::configure_classes_routes;

use actix_web::web;

/// 挂载全部 `/api` 路由
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_classes_routes)
        .configure(configure_assignments_routes)
        .configure(configure_attendance_routes);
}
