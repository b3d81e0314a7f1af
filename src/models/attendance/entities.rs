use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::classes::entities::ClassSummary;
use crate::models::users::entities::UserSummary;

// 考勤状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "attendance.ts")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    pub const PRESENT: &'static str = "present";
    pub const ABSENT: &'static str = "absent";
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "{}", AttendanceStatus::PRESENT),
            AttendanceStatus::Absent => write!(f, "{}", AttendanceStatus::ABSENT),
        }
    }
}

impl std::str::FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            AttendanceStatus::PRESENT => Ok(AttendanceStatus::Present),
            AttendanceStatus::ABSENT => Ok(AttendanceStatus::Absent),
            _ => Err(format!("Invalid attendance status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceRecord {
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub date: chrono::DateTime<chrono::Utc>,
    pub status: AttendanceStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 带学生与班级信息的考勤记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub record: AttendanceRecord,
    pub student: UserSummary,
    pub class: ClassSummary,
}

// 单个班级的出勤统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceSummaryItem {
    pub class_id: i64,
    pub class_name: String,
    pub total: u64,
    pub present: u64,
    pub absent: u64,
    /// 出勤率（0-100，四舍五入）
    pub percentage: u32,
}

/// 出勤率，总数为 0 时为 0
pub fn attendance_percentage(present: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    ((present as f64 / total as f64) * 100.0).round() as u32
}

/// 按班级聚合考勤记录，保持班级首次出现的顺序
pub fn summarize_by_class<'a, I>(records: I) -> Vec<AttendanceSummaryItem>
where
    I: IntoIterator<Item = (&'a AttendanceRecord, &'a str)>,
{
    let mut items: Vec<AttendanceSummaryItem> = Vec::new();

    for (record, class_name) in records {
        let idx = match items.iter().position(|i| i.class_id == record.class_id) {
            Some(idx) => idx,
            None => {
                items.push(AttendanceSummaryItem {
                    class_id: record.class_id,
                    class_name: class_name.to_string(),
                    total: 0,
                    present: 0,
                    absent: 0,
                    percentage: 0,
                });
                items.len() - 1
            }
        };

        let item = &mut items[idx];
        item.total += 1;
        match record.status {
            AttendanceStatus::Present => item.present += 1,
            AttendanceStatus::Absent => item.absent += 1,
        }
    }

    for item in &mut items {
        item.percentage = attendance_percentage(item.present, item.total);
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, class_id: i64, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            id,
            student_id: 7,
            class_id,
            date: chrono::Utc::now(),
            status,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_percentage_rounds_and_handles_zero() {
        assert_eq!(attendance_percentage(0, 0), 0);
        assert_eq!(attendance_percentage(2, 3), 67);
        assert_eq!(attendance_percentage(1, 3), 33);
        assert_eq!(attendance_percentage(1, 2), 50);
        assert_eq!(attendance_percentage(4, 4), 100);
    }

    #[test]
    fn test_summarize_groups_per_class() {
        let records = vec![
            record(1, 10, AttendanceStatus::Present),
            record(2, 20, AttendanceStatus::Absent),
            record(3, 10, AttendanceStatus::Absent),
            record(4, 10, AttendanceStatus::Present),
        ];
        let items = summarize_by_class(records.iter().map(|r| {
            let name = if r.class_id == 10 { "Algebra" } else { "Physics" };
            (r, name)
        }));

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].class_name, "Algebra");
        assert_eq!((items[0].total, items[0].present, items[0].absent), (3, 2, 1));
        assert_eq!(items[0].percentage, 67);
        assert_eq!(items[1].class_id, 20);
        assert_eq!(items[1].percentage, 0);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("present".parse::<AttendanceStatus>(), Ok(AttendanceStatus::Present));
        assert_eq!("absent".parse::<AttendanceStatus>(), Ok(AttendanceStatus::Absent));
        assert!("late".parse::<AttendanceStatus>().is_err());
        assert_eq!(AttendanceStatus::Absent.to_string(), "absent");
    }
}
