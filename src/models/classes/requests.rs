use super::entities::Schedule;
use serde::Deserialize;
use ts_rs::TS;

// 创建班级请求，教师即当前登录用户
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct CreateClassRequest {
    pub name: String,
    pub subject: String,
    pub description: Option<String>,
    #[serde(default)]
    pub schedule: Option<Schedule>,
}

// 更新班级请求，未提供的字段保持不变
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub description: Option<String>,
    pub schedule: Option<Schedule>,
}

// 按邮箱添加学生
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct AddStudentRequest {
    pub email: String,
}
