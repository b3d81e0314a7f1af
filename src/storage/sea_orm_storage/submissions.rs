//! 提交存储操作

use super::SeaOrmStorage;
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{Result, SchoolError};
use crate::models::assignments::entities::{SavedSubmission, Submission};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 获取某学生对某作业的提交
    pub async fn get_submission_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("查询提交失败", e))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(&self, submission_id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("查询提交失败", e))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 插入或覆盖提交
    ///
    /// 依赖 (assignment_id, student_id) 唯一索引：先 `ON CONFLICT DO NOTHING` 插入，
    /// 未插入时再覆盖内容与提交时间。并发的首次提交只有一个会被标记为新建，
    /// 已有记录的 ID 与评分保持不变。
    pub async fn upsert_submission_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
        content: &str,
    ) -> Result<SavedSubmission> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            assignment_id: Set(assignment_id),
            student_id: Set(student_id),
            content: Set(content.to_string()),
            submitted_at: Set(now),
            grade: Set(None),
            feedback: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let inserted = Submissions::insert(model)
            .on_conflict(
                OnConflict::columns([Column::AssignmentId, Column::StudentId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("保存提交失败", e))?;
        let created = inserted > 0;

        if !created {
            Submissions::update_many()
                .col_expr(Column::Content, Expr::value(content))
                .col_expr(Column::SubmittedAt, Expr::value(now))
                .col_expr(Column::UpdatedAt, Expr::value(now))
                .filter(Column::AssignmentId.eq(assignment_id))
                .filter(Column::StudentId.eq(student_id))
                .exec(&self.db)
                .await
                .map_err(|e| SchoolError::from_db("更新提交失败", e))?;
        }

        let submission = self
            .get_submission_impl(assignment_id, student_id)
            .await?
            .ok_or_else(|| SchoolError::not_found("Submission disappeared after upsert"))?;

        Ok(SavedSubmission {
            submission,
            created,
        })
    }

    /// 评分
    pub async fn grade_submission_impl(
        &self,
        submission_id: i64,
        grade: f64,
        feedback: Option<String>,
    ) -> Result<Option<Submission>> {
        let existing = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("查询提交失败", e))?;

        if existing.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(submission_id),
            grade: Set(Some(grade)),
            feedback: Set(feedback),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("更新评分失败", e))?;

        Ok(Some(result.into_submission()))
    }
}

#[cfg(test)]
mod tests {
    use crate::models::users::entities::UserRole;
    use crate::storage::Storage;
    use crate::test_utils::{seed_assignment, seed_class, seed_user, setup_test_storage};

    #[tokio::test]
    async fn test_resubmission_overwrites_in_place() {
        let storage = setup_test_storage().await;
        let teacher = seed_user(&storage, "T", "t@school.test", UserRole::Teacher).await;
        let student = seed_user(&storage, "S", "s@school.test", UserRole::Student).await;
        let class = seed_class(&storage, teacher.id, "Algebra").await;
        storage.add_student_to_class(class.id, student.id).await.unwrap();
        let hw = seed_assignment(&storage, &class, "HW1", chrono::Duration::days(1)).await;

        let first = storage.upsert_submission(hw.id, student.id, "draft").await.unwrap();
        assert!(first.created);
        let first = first.submission;
        let graded = storage
            .grade_submission(first.id, 88.0, Some("ok".into()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(graded.grade, Some(88.0));

        let second = storage.upsert_submission(hw.id, student.id, "final").await.unwrap();
        assert!(!second.created);
        let second = second.submission;
        assert_eq!(second.id, first.id);
        assert_eq!(second.content, "final");
        assert_eq!(second.grade, Some(88.0));

        let detail = storage
            .get_assignment_detail(
                hw.id,
                crate::models::assignments::entities::SubmissionVisibility::All,
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.submissions.len(), 1);
        assert_eq!(detail.submissions[0].submission.content, "final");
    }

    #[tokio::test]
    async fn test_concurrent_submissions_leave_one_row() {
        let storage = setup_test_storage().await;
        let teacher = seed_user(&storage, "T", "t@school.test", UserRole::Teacher).await;
        let student = seed_user(&storage, "S", "s@school.test", UserRole::Student).await;
        let class = seed_class(&storage, teacher.id, "Algebra").await;
        storage.add_student_to_class(class.id, student.id).await.unwrap();
        let hw = seed_assignment(&storage, &class, "HW1", chrono::Duration::days(1)).await;

        let (a, b) = tokio::join!(
            storage.upsert_submission(hw.id, student.id, "one"),
            storage.upsert_submission(hw.id, student.id, "two"),
        );
        let (a, b) = (a.unwrap(), b.unwrap());
        assert_eq!(a.submission.id, b.submission.id);
        // 只有一次写入新建了记录
        assert_ne!(a.created, b.created);

        let detail = storage
            .get_assignment_detail(
                hw.id,
                crate::models::assignments::entities::SubmissionVisibility::All,
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.submissions.len(), 1);
    }

    #[tokio::test]
    async fn test_grade_missing_submission() {
        let storage = setup_test_storage().await;
        assert!(storage.grade_submission(42, 50.0, None).await.unwrap().is_none());
    }
}
