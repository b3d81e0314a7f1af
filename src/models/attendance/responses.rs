use super::entities::{AttendanceDetail, AttendanceSummaryItem};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceListResponse {
    pub items: Vec<AttendanceDetail>,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceSummaryResponse {
    pub items: Vec<AttendanceSummaryItem>,
}
