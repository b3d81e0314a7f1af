use std::sync::Arc;

use crate::models::{
    assignments::{
        entities::{
            Assignment, AssignmentDetail, SavedSubmission, Submission, SubmissionVisibility,
        },
        requests::{AssignmentChanges, NewAssignment},
    },
    attendance::{entities::AttendanceDetail, requests::NewAttendanceRecord},
    classes::{
        entities::{Class, ClassDetail},
        requests::{CreateClassRequest, UpdateClassRequest},
    },
    users::{entities::User, requests::CreateUserRequest},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（password 字段为已哈希的密码）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// 班级管理方法
    // 创建班级
    async fn create_class(&self, teacher_id: i64, class: CreateClassRequest) -> Result<Class>;
    // 通过ID获取班级信息
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    // 获取带教师和学生信息的班级
    async fn get_class_detail(&self, class_id: i64) -> Result<Option<ClassDetail>>;
    // 列出教师拥有的班级，最新的在前
    async fn list_classes_by_teacher(&self, teacher_id: i64) -> Result<Vec<ClassDetail>>;
    // 列出学生加入的班级，最新的在前
    async fn list_classes_by_student(&self, student_id: i64) -> Result<Vec<ClassDetail>>;
    // 更新班级信息
    async fn update_class(&self, class_id: i64, update: UpdateClassRequest)
    -> Result<Option<Class>>;
    // 删除班级及其作业、提交、考勤和成员关系
    async fn delete_class(&self, class_id: i64) -> Result<bool>;

    /// 班级学生管理方法
    // 添加学生，重复添加返回 Conflict
    async fn add_student_to_class(&self, class_id: i64, student_id: i64) -> Result<()>;
    // 移除学生，返回是否实际删除
    async fn remove_student_from_class(&self, class_id: i64, student_id: i64) -> Result<bool>;
    // 学生是否在班级中
    async fn is_student_enrolled(&self, class_id: i64, student_id: i64) -> Result<bool>;

    /// 作业管理方法
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    async fn get_assignment_detail(
        &self,
        assignment_id: i64,
        visibility: SubmissionVisibility,
    ) -> Result<Option<AssignmentDetail>>;
    // 教师布置的作业，最新的在前
    async fn list_assignments_by_teacher(&self, teacher_id: i64)
    -> Result<Vec<AssignmentDetail>>;
    // 学生所在班级的作业，按截止时间升序
    async fn list_assignments_for_student(&self, student_id: i64)
    -> Result<Vec<AssignmentDetail>>;
    // 某班级的作业，最新的在前
    async fn list_assignments_by_class(
        &self,
        class_id: i64,
        visibility: SubmissionVisibility,
    ) -> Result<Vec<AssignmentDetail>>;
    async fn update_assignment(
        &self,
        assignment_id: i64,
        changes: AssignmentChanges,
    ) -> Result<Option<Assignment>>;
    // 删除作业及其全部提交
    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool>;

    /// 提交管理方法
    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>>;
    // 按 (作业, 学生) 插入或覆盖提交
    async fn upsert_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
        content: &str,
    ) -> Result<SavedSubmission>;
    async fn grade_submission(
        &self,
        submission_id: i64,
        grade: f64,
        feedback: Option<String>,
    ) -> Result<Option<Submission>>;

    /// 考勤管理方法
    // 批量写入，全部成功或全部失败
    async fn mark_attendance(
        &self,
        records: Vec<NewAttendanceRecord>,
    ) -> Result<Vec<AttendanceDetail>>;
    async fn list_attendance_by_student(&self, student_id: i64) -> Result<Vec<AttendanceDetail>>;
    // 教师所拥有班级的考勤
    async fn list_attendance_by_teacher(&self, teacher_id: i64) -> Result<Vec<AttendanceDetail>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
