//! 班级存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use super::users::summary_or_placeholder;
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::attendance::{Column as AttendanceColumn, Entity as Attendance};
use crate::entity::class_students::{
    ActiveModel as ClassStudentActiveModel, Column as ClassStudentColumn, Entity as ClassStudents,
};
use crate::entity::classes::{ActiveModel, Column, Entity as Classes, Model as ClassModel};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{Result, SchoolError};
use crate::models::classes::{
    entities::{Class, ClassDetail},
    requests::{CreateClassRequest, UpdateClassRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建班级
    pub async fn create_class_impl(
        &self,
        teacher_id: i64,
        req: CreateClassRequest,
    ) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();
        let schedule = req.schedule.unwrap_or_default();

        let model = ActiveModel {
            teacher_id: Set(teacher_id),
            name: Set(req.name),
            subject: Set(req.subject),
            description: Set(req.description),
            day_of_week: Set(schedule.day_of_week),
            start_time: Set(schedule.start_time),
            end_time: Set(schedule.end_time),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("创建班级失败", e))?;

        Ok(result.into_class())
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("查询班级失败", e))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 获取带教师和学生信息的班级
    pub async fn get_class_detail_impl(&self, class_id: i64) -> Result<Option<ClassDetail>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("查询班级失败", e))?;

        match result {
            Some(model) => Ok(self.populate_classes(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    /// 列出教师拥有的班级
    pub async fn list_classes_by_teacher_impl(&self, teacher_id: i64) -> Result<Vec<ClassDetail>> {
        let classes = Classes::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("查询班级列表失败", e))?;

        self.populate_classes(classes).await
    }

    /// 列出学生加入的班级
    pub async fn list_classes_by_student_impl(&self, student_id: i64) -> Result<Vec<ClassDetail>> {
        let class_ids = self.class_ids_for_student(student_id).await?;

        let classes = Classes::find()
            .filter(Column::Id.is_in(class_ids))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("查询班级列表失败", e))?;

        self.populate_classes(classes).await
    }

    /// 更新班级信息
    pub async fn update_class_impl(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        let existing = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("查询班级失败", e))?;

        if existing.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(class_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(subject) = update.subject {
            model.subject = Set(subject);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(schedule) = update.schedule {
            model.day_of_week = Set(schedule.day_of_week);
            model.start_time = Set(schedule.start_time);
            model.end_time = Set(schedule.end_time);
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("更新班级失败", e))?;

        Ok(Some(result.into_class()))
    }

    /// 删除班级，连同作业提交、作业、考勤和成员关系在同一事务中删除
    pub async fn delete_class_impl(&self, class_id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolError::from_db("开启事务失败", e))?;

        let assignment_ids: Vec<i64> = Assignments::find()
            .select_only()
            .column(AssignmentColumn::Id)
            .filter(AssignmentColumn::ClassId.eq(class_id))
            .into_tuple()
            .all(&txn)
            .await
            .map_err(|e| SchoolError::from_db("查询班级作业失败", e))?;

        Submissions::delete_many()
            .filter(SubmissionColumn::AssignmentId.is_in(assignment_ids))
            .exec(&txn)
            .await
            .map_err(|e| SchoolError::from_db("删除作业提交失败", e))?;

        Assignments::delete_many()
            .filter(AssignmentColumn::ClassId.eq(class_id))
            .exec(&txn)
            .await
            .map_err(|e| SchoolError::from_db("删除班级作业失败", e))?;

        Attendance::delete_many()
            .filter(AttendanceColumn::ClassId.eq(class_id))
            .exec(&txn)
            .await
            .map_err(|e| SchoolError::from_db("删除班级考勤失败", e))?;

        ClassStudents::delete_many()
            .filter(ClassStudentColumn::ClassId.eq(class_id))
            .exec(&txn)
            .await
            .map_err(|e| SchoolError::from_db("删除班级成员失败", e))?;

        let result = Classes::delete_by_id(class_id)
            .exec(&txn)
            .await
            .map_err(|e| SchoolError::from_db("删除班级失败", e))?;

        txn.commit()
            .await
            .map_err(|e| SchoolError::from_db("提交事务失败", e))?;

        Ok(result.rows_affected > 0)
    }

    /// 添加学生到班级，唯一索引保证不会重复
    pub async fn add_student_to_class_impl(&self, class_id: i64, student_id: i64) -> Result<()> {
        let model = ClassStudentActiveModel {
            class_id: Set(class_id),
            student_id: Set(student_id),
            joined_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| match SchoolError::from_db("添加班级学生失败", e) {
                err if err.is_unique_violation() => SchoolError::conflict(format!(
                    "Student {student_id} is already enrolled in class {class_id}"
                )),
                err => err,
            })?;

        Ok(())
    }

    /// 从班级移除学生
    pub async fn remove_student_from_class_impl(
        &self,
        class_id: i64,
        student_id: i64,
    ) -> Result<bool> {
        let result = ClassStudents::delete_many()
            .filter(ClassStudentColumn::ClassId.eq(class_id))
            .filter(ClassStudentColumn::StudentId.eq(student_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("移除班级学生失败", e))?;

        Ok(result.rows_affected > 0)
    }

    /// 学生是否在班级中
    pub async fn is_student_enrolled_impl(&self, class_id: i64, student_id: i64) -> Result<bool> {
        let count = ClassStudents::find()
            .filter(ClassStudentColumn::ClassId.eq(class_id))
            .filter(ClassStudentColumn::StudentId.eq(student_id))
            .count(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("查询班级成员失败", e))?;

        Ok(count > 0)
    }

    /// 学生加入的全部班级 ID
    pub(super) async fn class_ids_for_student(&self, student_id: i64) -> Result<Vec<i64>> {
        ClassStudents::find()
            .select_only()
            .column(ClassStudentColumn::ClassId)
            .filter(ClassStudentColumn::StudentId.eq(student_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("查询学生班级失败", e))
    }

    /// 批量加载班级模型，按 ID 索引
    pub(super) async fn load_class_models(
        &self,
        ids: impl IntoIterator<Item = i64>,
    ) -> Result<HashMap<i64, ClassModel>> {
        let mut ids: Vec<i64> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let classes = Classes::find()
            .filter(Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("查询班级列表失败", e))?;

        Ok(classes.into_iter().map(|c| (c.id, c)).collect())
    }

    /// 为班级填充教师与学生信息，保持输入顺序
    async fn populate_classes(&self, classes: Vec<ClassModel>) -> Result<Vec<ClassDetail>> {
        if classes.is_empty() {
            return Ok(Vec::new());
        }

        let class_ids: Vec<i64> = classes.iter().map(|c| c.id).collect();
        let memberships = ClassStudents::find()
            .filter(ClassStudentColumn::ClassId.is_in(class_ids))
            .order_by_asc(ClassStudentColumn::JoinedAt)
            .order_by_asc(ClassStudentColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("查询班级成员失败", e))?;

        let users = self
            .load_user_summaries(
                classes
                    .iter()
                    .map(|c| c.teacher_id)
                    .chain(memberships.iter().map(|m| m.student_id)),
            )
            .await?;

        let mut students_by_class: HashMap<i64, Vec<i64>> = HashMap::new();
        for m in &memberships {
            students_by_class
                .entry(m.class_id)
                .or_default()
                .push(m.student_id);
        }

        Ok(classes
            .into_iter()
            .map(|model| {
                let teacher = summary_or_placeholder(&users, model.teacher_id);
                let students = students_by_class
                    .get(&model.id)
                    .map(|ids| ids.iter().filter_map(|id| users.get(id).cloned()).collect())
                    .unwrap_or_default();
                ClassDetail {
                    class: model.into_class(),
                    teacher,
                    students,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::models::classes::requests::{CreateClassRequest, UpdateClassRequest};
    use crate::models::users::entities::UserRole;
    use crate::storage::Storage;
    use crate::test_utils::{seed_class, seed_user, setup_test_storage};

    #[tokio::test]
    async fn test_add_student_twice_is_conflict_and_count_unchanged() {
        let storage = setup_test_storage().await;
        let teacher = seed_user(&storage, "T", "t@school.test", UserRole::Teacher).await;
        let student = seed_user(&storage, "S", "s@school.test", UserRole::Student).await;
        let class = seed_class(&storage, teacher.id, "Algebra").await;

        storage
            .add_student_to_class(class.id, student.id)
            .await
            .unwrap();
        let err = storage
            .add_student_to_class(class.id, student.id)
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());

        let detail = storage.get_class_detail(class.id).await.unwrap().unwrap();
        assert_eq!(detail.students.len(), 1);
        assert_eq!(detail.students[0].email, "s@school.test");
        assert_eq!(detail.teacher.id, teacher.id);
    }

    #[tokio::test]
    async fn test_list_by_teacher_and_student() {
        let storage = setup_test_storage().await;
        let teacher = seed_user(&storage, "T", "t@school.test", UserRole::Teacher).await;
        let other = seed_user(&storage, "O", "o@school.test", UserRole::Teacher).await;
        let student = seed_user(&storage, "S", "s@school.test", UserRole::Student).await;

        let algebra = seed_class(&storage, teacher.id, "Algebra").await;
        let physics = seed_class(&storage, teacher.id, "Physics").await;
        seed_class(&storage, other.id, "Chemistry").await;
        storage
            .add_student_to_class(algebra.id, student.id)
            .await
            .unwrap();

        let owned = storage.list_classes_by_teacher(teacher.id).await.unwrap();
        let names: Vec<_> = owned.iter().map(|c| c.class.name.as_str()).collect();
        assert_eq!(names, vec!["Physics", "Algebra"]);
        assert_eq!(owned[0].class.id, physics.id);

        let enrolled = storage.list_classes_by_student(student.id).await.unwrap();
        assert_eq!(enrolled.len(), 1);
        assert_eq!(enrolled[0].class.id, algebra.id);
    }

    #[tokio::test]
    async fn test_remove_student_is_idempotent() {
        let storage = setup_test_storage().await;
        let teacher = seed_user(&storage, "T", "t@school.test", UserRole::Teacher).await;
        let student = seed_user(&storage, "S", "s@school.test", UserRole::Student).await;
        let class = seed_class(&storage, teacher.id, "Algebra").await;
        storage
            .add_student_to_class(class.id, student.id)
            .await
            .unwrap();

        assert!(storage
            .remove_student_from_class(class.id, student.id)
            .await
            .unwrap());
        assert!(!storage
            .remove_student_from_class(class.id, student.id)
            .await
            .unwrap());
        assert!(!storage.is_student_enrolled(class.id, student.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_class_keeps_unspecified_fields() {
        let storage = setup_test_storage().await;
        let teacher = seed_user(&storage, "T", "t@school.test", UserRole::Teacher).await;
        let class = storage
            .create_class(
                teacher.id,
                CreateClassRequest {
                    name: "Algebra".into(),
                    subject: "Math".into(),
                    description: Some("Intro".into()),
                    schedule: None,
                },
            )
            .await
            .unwrap();

        let updated = storage
            .update_class(
                class.id,
                UpdateClassRequest {
                    subject: Some("Mathematics".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Algebra");
        assert_eq!(updated.subject, "Mathematics");
        assert_eq!(updated.description.as_deref(), Some("Intro"));

        assert!(storage
            .update_class(9999, UpdateClassRequest::default())
            .await
            .unwrap()
            .is_none());
    }
}
