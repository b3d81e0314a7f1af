use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::classes::entities::ClassSummary;
use crate::models::users::entities::UserSummary;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct Assignment {
    // 唯一 ID
    pub id: i64,
    // 作业标题
    pub title: String,
    // 作业描述
    pub description: Option<String>,
    // 关联的班级 ID
    pub class_id: i64,
    // 布置作业的教师 ID
    pub teacher_id: i64,
    // 截止时间
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 学生提交，每个 (作业, 学生) 只有一条
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub content: String,
    // 最近一次提交时间，重新提交时覆盖
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub grade: Option<f64>,
    pub feedback: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct SubmissionDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub submission: Submission,
    pub student: UserSummary,
}

// 带班级、教师与提交列表的作业
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct AssignmentDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub assignment: Assignment,
    pub class: ClassSummary,
    pub teacher: UserSummary,
    pub submissions: Vec<SubmissionDetail>,
}

/// 提交写入结果，`created` 表示本次写入新建了记录
#[derive(Debug, Clone)]
pub struct SavedSubmission {
    pub submission: Submission,
    pub created: bool,
}

/// 作业列表中附带哪些提交：教师看到全部，学生只看到自己的
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionVisibility {
    All,
    OwnOnly(i64),
}

impl SubmissionVisibility {
    pub fn for_user(user: &crate::models::users::entities::User) -> Self {
        if user.role.is_teacher() {
            SubmissionVisibility::All
        } else {
            SubmissionVisibility::OwnOnly(user.id)
        }
    }
}
