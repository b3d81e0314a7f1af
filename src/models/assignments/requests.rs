use serde::Deserialize;
use ts_rs::TS;

/// 创建作业请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct CreateAssignmentRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(alias = "class", alias = "classId")]
    pub class_id: i64,
    #[serde(alias = "dueDate")]
    pub due_date: String, // "2026-01-24" 或 "2026-01-24T12:00:00Z"
}

/// 更新作业请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, alias = "dueDate")]
    pub due_date: Option<String>,
}

/// 提交作业请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct SubmitAssignmentRequest {
    #[serde(alias = "submission")]
    pub content: String,
}

/// 评分请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct GradeSubmissionRequest {
    pub grade: f64,
    pub feedback: Option<String>,
}

// 用于存储层的内部参数，日期已完成解析
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub class_id: i64,
    pub teacher_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct AssignmentChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
}
