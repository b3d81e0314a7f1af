//! 作业存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use super::users::summary_or_placeholder;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments, Model};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{Result, SchoolError};
use crate::models::assignments::{
    entities::{Assignment, AssignmentDetail, SubmissionDetail, SubmissionVisibility},
    requests::{AssignmentChanges, NewAssignment},
};
use crate::models::classes::entities::ClassSummary;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建作业
    pub async fn create_assignment_impl(&self, req: NewAssignment) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            class_id: Set(req.class_id),
            teacher_id: Set(req.teacher_id),
            title: Set(req.title),
            description: Set(req.description),
            due_date: Set(req.due_date.timestamp()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("创建作业失败", e))?;

        Ok(result.into_assignment())
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("查询作业失败", e))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 获取带班级、教师和提交信息的作业
    pub async fn get_assignment_detail_impl(
        &self,
        assignment_id: i64,
        visibility: SubmissionVisibility,
    ) -> Result<Option<AssignmentDetail>> {
        let result = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("查询作业失败", e))?;

        match result {
            Some(model) => Ok(self
                .populate_assignments(vec![model], visibility)
                .await?
                .pop()),
            None => Ok(None),
        }
    }

    /// 教师布置的作业，最新的在前，附带全部提交
    pub async fn list_assignments_by_teacher_impl(
        &self,
        teacher_id: i64,
    ) -> Result<Vec<AssignmentDetail>> {
        let assignments = Assignments::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("查询作业列表失败", e))?;

        self.populate_assignments(assignments, SubmissionVisibility::All)
            .await
    }

    /// 学生所在班级的作业，按截止时间升序，只附带该学生自己的提交
    pub async fn list_assignments_for_student_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<AssignmentDetail>> {
        let class_ids = self.class_ids_for_student(student_id).await?;

        let assignments = Assignments::find()
            .filter(Column::ClassId.is_in(class_ids))
            .order_by_asc(Column::DueDate)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("查询作业列表失败", e))?;

        self.populate_assignments(assignments, SubmissionVisibility::OwnOnly(student_id))
            .await
    }

    /// 某班级的作业，最新的在前
    pub async fn list_assignments_by_class_impl(
        &self,
        class_id: i64,
        visibility: SubmissionVisibility,
    ) -> Result<Vec<AssignmentDetail>> {
        let assignments = Assignments::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("查询作业列表失败", e))?;

        self.populate_assignments(assignments, visibility).await
    }

    /// 更新作业
    pub async fn update_assignment_impl(
        &self,
        assignment_id: i64,
        changes: AssignmentChanges,
    ) -> Result<Option<Assignment>> {
        let existing = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("查询作业失败", e))?;

        if existing.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(assignment_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(title) = changes.title {
            model.title = Set(title);
        }
        if let Some(description) = changes.description {
            model.description = Set(Some(description));
        }
        if let Some(due_date) = changes.due_date {
            model.due_date = Set(due_date.timestamp());
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("更新作业失败", e))?;

        Ok(Some(result.into_assignment()))
    }

    /// 删除作业：先删除全部提交，再删除作业本身
    pub async fn delete_assignment_impl(&self, assignment_id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolError::from_db("开启事务失败", e))?;

        Submissions::delete_many()
            .filter(SubmissionColumn::AssignmentId.eq(assignment_id))
            .exec(&txn)
            .await
            .map_err(|e| SchoolError::from_db("删除作业提交失败", e))?;

        let result = Assignments::delete_by_id(assignment_id)
            .exec(&txn)
            .await
            .map_err(|e| SchoolError::from_db("删除作业失败", e))?;

        txn.commit()
            .await
            .map_err(|e| SchoolError::from_db("提交事务失败", e))?;

        Ok(result.rows_affected > 0)
    }

    /// 为作业填充班级、教师与提交信息，保持输入顺序
    async fn populate_assignments(
        &self,
        assignments: Vec<Model>,
        visibility: SubmissionVisibility,
    ) -> Result<Vec<AssignmentDetail>> {
        if assignments.is_empty() {
            return Ok(Vec::new());
        }

        let assignment_ids: Vec<i64> = assignments.iter().map(|a| a.id).collect();
        let mut select = Submissions::find()
            .filter(SubmissionColumn::AssignmentId.is_in(assignment_ids))
            .order_by_asc(SubmissionColumn::SubmittedAt)
            .order_by_asc(SubmissionColumn::Id);
        if let SubmissionVisibility::OwnOnly(student_id) = visibility {
            select = select.filter(SubmissionColumn::StudentId.eq(student_id));
        }
        let submissions = select
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("查询作业提交失败", e))?;

        let classes = self
            .load_class_models(assignments.iter().map(|a| a.class_id))
            .await?;
        let users = self
            .load_user_summaries(
                assignments
                    .iter()
                    .map(|a| a.teacher_id)
                    .chain(submissions.iter().map(|s| s.student_id)),
            )
            .await?;

        let mut submissions_by_assignment: HashMap<i64, Vec<SubmissionDetail>> = HashMap::new();
        for s in submissions {
            let student = summary_or_placeholder(&users, s.student_id);
            submissions_by_assignment
                .entry(s.assignment_id)
                .or_default()
                .push(SubmissionDetail {
                    submission: s.into_submission(),
                    student,
                });
        }

        Ok(assignments
            .into_iter()
            .map(|model| {
                let class = classes
                    .get(&model.class_id)
                    .map(|c| c.summary())
                    .unwrap_or(ClassSummary {
                        id: model.class_id,
                        name: String::new(),
                        subject: String::new(),
                    });
                let teacher = summary_or_placeholder(&users, model.teacher_id);
                let submissions = submissions_by_assignment
                    .remove(&model.id)
                    .unwrap_or_default();
                AssignmentDetail {
                    assignment: model.into_assignment(),
                    class,
                    teacher,
                    submissions,
                }
            })
            .collect())
    }
}
