//! 业务数据模型
//!
//! 与 `entity` 中的数据库实体分离，所有 HTTP 请求/响应类型都定义在这里。

pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod classes;
pub mod common;
pub mod users;

pub use common::response::ApiResponse;

/// 业务错误代码
///
/// 通过 `ApiResponse.code` 返回给客户端，0 表示成功。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1002,
    NotFound = 1003,
    Conflict = 1004,
    RateLimitExceeded = 1005,
    InternalServerError = 1006,

    // 认证与用户
    AuthFailed = 2000,
    RegisterFailed = 2001,
    UserNotFound = 2002,
    UserEmailInvalid = 2003,
    UserEmailAlreadyExists = 2004,
    UserPasswordInvalid = 2005,
    UserRoleInvalid = 2006,

    // 班级
    ClassNotFound = 3000,
    ClassCreationFailed = 3001,
    ClassUpdateFailed = 3002,
    ClassDeleteFailed = 3003,
    ClassPermissionDenied = 3004,
    StudentNotFound = 3005,
    StudentAlreadyEnrolled = 3006,
    StudentNotEnrolled = 3007,

    // 作业与提交
    AssignmentNotFound = 4000,
    AssignmentCreationFailed = 4001,
    AssignmentUpdateFailed = 4002,
    AssignmentDeleteFailed = 4003,
    AssignmentPermissionDenied = 4004,
    SubmissionFailed = 4005,
    SubmissionNotFound = 4006,
    GradeInvalid = 4007,

    // 考勤
    AttendanceInvalid = 5000,
    AttendanceMarkFailed = 5001,
    AttendanceFetchFailed = 5002,
}
