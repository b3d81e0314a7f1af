use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::UserSummary;

// 上课时间安排，字段均为不做校验的原始字符串
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct Schedule {
    #[serde(default, alias = "dayOfWeek")]
    pub day_of_week: Option<String>,
    #[serde(default, alias = "startTime")]
    pub start_time: Option<String>,
    #[serde(default, alias = "endTime")]
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct Class {
    // 班级ID
    pub id: i64,
    // 班级名称
    pub name: String,
    // 科目
    pub subject: String,
    // 班级描述
    pub description: Option<String>,
    // 上课时间
    pub schedule: Schedule,
    // 教师ID
    pub teacher_id: i64,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 更新时间
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Class {
    pub fn summary(&self) -> ClassSummary {
        ClassSummary {
            id: self.id,
            name: self.name.clone(),
            subject: self.subject.clone(),
        }
    }
}

// 嵌入在作业、考勤响应中的班级摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct ClassSummary {
    pub id: i64,
    pub name: String,
    pub subject: String,
}

// 带教师与学生信息的班级
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct ClassDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub class: Class,
    pub teacher: UserSummary,
    pub students: Vec<UserSummary>,
}
