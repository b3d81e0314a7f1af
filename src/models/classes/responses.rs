use super::entities::ClassDetail;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 班级列表响应
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct ClassListResponse {
    pub items: Vec<ClassDetail>,
}
