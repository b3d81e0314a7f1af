use super::entities::AttendanceStatus;
use serde::Deserialize;
use ts_rs::TS;

// 单条考勤输入，缺失字段在服务层统一校验
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceRecordInput {
    #[serde(default, alias = "student")]
    pub student_id: Option<i64>,
    #[serde(default, alias = "class")]
    pub class_id: Option<i64>,
    #[serde(default)]
    pub status: Option<AttendanceStatus>,
    #[serde(default)]
    pub date: Option<String>,
}

// 批量考勤请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct MarkAttendanceRequest {
    #[serde(alias = "attendanceRecords")]
    pub attendance_records: Vec<AttendanceRecordInput>,
}

// 用于存储层的内部参数，校验后的单条考勤
#[derive(Debug, Clone)]
pub struct NewAttendanceRecord {
    pub student_id: i64,
    pub class_id: i64,
    pub date: chrono::DateTime<chrono::Utc>,
    pub status: AttendanceStatus,
}
