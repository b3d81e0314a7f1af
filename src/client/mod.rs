//! 客户端状态缓存
//!
//! 前端按资源保存服务端返回的数据，变更成功后直接按 ID 修补本地列表。

pub mod store;

pub use store::{Identified, ResourceStore};

use crate::models::assignments::entities::AssignmentDetail;
use crate::models::attendance::entities::{
    AttendanceDetail, AttendanceSummaryItem, summarize_by_class,
};
use crate::models::classes::entities::ClassDetail;

#[derive(Debug, Clone, Default)]
pub struct ClientState {
    pub assignments: ResourceStore<AssignmentDetail>,
    pub classes: ResourceStore<ClassDetail>,
    pub attendance: ResourceStore<AttendanceDetail>,
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 根据本地考勤记录计算单个班级的出勤统计，没有记录时返回 None
    pub fn attendance_summary(&self, class_id: i64) -> Option<AttendanceSummaryItem> {
        summarize_by_class(
            self.attendance
                .items
                .iter()
                .filter(|d| d.record.class_id == class_id)
                .map(|d| (&d.record, d.class.name.as_str())),
        )
        .into_iter()
        .next()
    }

    /// 退出登录时清空全部缓存
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::entities::{AttendanceRecord, AttendanceStatus};
    use crate::models::classes::entities::ClassSummary;
    use crate::models::users::entities::UserSummary;

    fn attendance(id: i64, class_id: i64, status: AttendanceStatus) -> AttendanceDetail {
        let now = chrono::Utc::now();
        AttendanceDetail {
            record: AttendanceRecord {
                id,
                student_id: 5,
                class_id,
                date: now,
                status,
                created_at: now,
            },
            student: UserSummary {
                id: 5,
                name: "Student".to_string(),
                email: "student@example.com".to_string(),
            },
            class: ClassSummary {
                id: class_id,
                name: format!("Class {class_id}"),
                subject: "Math".to_string(),
            },
        }
    }

    #[test]
    fn test_attendance_summary_from_cache() {
        let mut state = ClientState::new();
        state.attendance.fetch_succeeded(vec![
            attendance(1, 10, AttendanceStatus::Present),
            attendance(2, 10, AttendanceStatus::Absent),
        ]);
        state.attendance.appended(vec![
            attendance(3, 10, AttendanceStatus::Present),
            attendance(4, 20, AttendanceStatus::Absent),
        ]);

        let summary = state.attendance_summary(10).unwrap();
        assert_eq!(summary.class_name, "Class 10");
        assert_eq!((summary.total, summary.present, summary.absent), (3, 2, 1));
        assert_eq!(summary.percentage, 67);

        assert_eq!(state.attendance_summary(20).unwrap().percentage, 0);
        assert!(state.attendance_summary(30).is_none());
    }

    #[test]
    fn test_reset_clears_all_stores() {
        let mut state = ClientState::new();
        state.attendance.created(attendance(1, 10, AttendanceStatus::Present));
        state.classes.failed("boom");

        state.reset();
        assert!(state.attendance.items.is_empty());
        assert!(state.classes.error.is_none());
    }
}
