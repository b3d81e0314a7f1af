use ts_rs::TS;

use crate::models::ApiResponse;
use crate::models::assignments::entities::AssignmentDetail;
use crate::models::attendance::entities::AttendanceDetail;
use crate::models::classes::entities::ClassDetail;

/// 可按 ID 在本地缓存中定位的资源
pub trait Identified {
    /// 资源的复数名称，用于默认错误提示
    const RESOURCE: &'static str;

    fn id(&self) -> i64;
}

impl Identified for AssignmentDetail {
    const RESOURCE: &'static str = "assignments";

    fn id(&self) -> i64 {
        self.assignment.id
    }
}

impl Identified for ClassDetail {
    const RESOURCE: &'static str = "classes";

    fn id(&self) -> i64 {
        self.class.id
    }
}

impl Identified for AttendanceDetail {
    const RESOURCE: &'static str = "attendance";

    fn id(&self) -> i64 {
        self.record.id
    }
}

/// 单类资源的客户端缓存
///
/// 变更操作按 ID 直接修补列表，调用方不必在变更后重新拉取。
#[derive(Debug, Clone)]
pub struct ResourceStore<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for ResourceStore<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

impl<T: Identified> ResourceStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 请求发出
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn fetch_succeeded(&mut self, items: Vec<T>) {
        self.loading = false;
        self.items = items;
    }

    pub fn failed(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    /// 使用服务端返回的 message；没有响应或 message 为空时退回默认提示
    pub fn failed_with_response<D: TS>(&mut self, response: Option<&ApiResponse<D>>) {
        let message = response
            .map(|r| r.message.trim())
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(Self::default_error);
        self.failed(message);
    }

    pub fn default_error() -> String {
        format!("Failed to fetch {}", T::RESOURCE)
    }

    pub fn created(&mut self, item: T) {
        self.loading = false;
        self.items.push(item);
    }

    /// 按 ID 替换；本地没有该条目时忽略
    pub fn updated(&mut self, item: T) {
        self.loading = false;
        if let Some(slot) = self.items.iter_mut().find(|i| i.id() == item.id()) {
            *slot = item;
        }
    }

    pub fn removed(&mut self, id: i64) {
        self.loading = false;
        self.items.retain(|i| i.id() != id);
    }

    /// 批量追加（考勤标记返回的记录）
    pub fn appended(&mut self, items: Vec<T>) {
        self.loading = false;
        self.items.extend(items);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|i| i.id() == id)
    }
}
