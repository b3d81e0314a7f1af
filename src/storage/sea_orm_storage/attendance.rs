//! 考勤存储操作

use super::SeaOrmStorage;
use super::users::summary_or_placeholder;
use crate::entity::attendance::{ActiveModel, Column, Entity as Attendance, Model};
use crate::entity::classes::{Column as ClassColumn, Entity as Classes};
use crate::errors::{Result, SchoolError};
use crate::models::attendance::{entities::AttendanceDetail, requests::NewAttendanceRecord};
use crate::models::classes::entities::ClassSummary;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 批量写入考勤记录，不去重；任意一条失败则整体回滚
    pub async fn mark_attendance_impl(
        &self,
        records: Vec<NewAttendanceRecord>,
    ) -> Result<Vec<AttendanceDetail>> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolError::from_db("开启事务失败", e))?;

        let mut inserted = Vec::with_capacity(records.len());
        for record in records {
            let model = ActiveModel {
                student_id: Set(record.student_id),
                class_id: Set(record.class_id),
                date: Set(record.date.timestamp()),
                status: Set(record.status.to_string()),
                created_at: Set(now),
                ..Default::default()
            };

            let result = model
                .insert(&txn)
                .await
                .map_err(|e| SchoolError::from_db("写入考勤失败", e))?;
            inserted.push(result);
        }

        txn.commit()
            .await
            .map_err(|e| SchoolError::from_db("提交事务失败", e))?;

        self.populate_attendance(inserted).await
    }

    /// 学生自己的考勤记录，日期最新的在前
    pub async fn list_attendance_by_student_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<AttendanceDetail>> {
        let records = Attendance::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::Date)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("查询考勤失败", e))?;

        self.populate_attendance(records).await
    }

    /// 教师所拥有班级的考勤记录，日期最新的在前
    pub async fn list_attendance_by_teacher_impl(
        &self,
        teacher_id: i64,
    ) -> Result<Vec<AttendanceDetail>> {
        let class_ids: Vec<i64> = Classes::find()
            .select_only()
            .column(ClassColumn::Id)
            .filter(ClassColumn::TeacherId.eq(teacher_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("查询教师班级失败", e))?;

        let records = Attendance::find()
            .filter(Column::ClassId.is_in(class_ids))
            .order_by_desc(Column::Date)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("查询考勤失败", e))?;

        self.populate_attendance(records).await
    }

    async fn populate_attendance(&self, records: Vec<Model>) -> Result<Vec<AttendanceDetail>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let users = self
            .load_user_summaries(records.iter().map(|r| r.student_id))
            .await?;
        let classes = self
            .load_class_models(records.iter().map(|r| r.class_id))
            .await?;

        records
            .into_iter()
            .map(|model| -> Result<AttendanceDetail> {
                let student = summary_or_placeholder(&users, model.student_id);
                let class = classes
                    .get(&model.class_id)
                    .map(|c| c.summary())
                    .unwrap_or(ClassSummary {
                        id: model.class_id,
                        name: String::new(),
                        subject: String::new(),
                    });
                Ok(AttendanceDetail {
                    record: model.into_record()?,
                    student,
                    class,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use crate::models::attendance::entities::AttendanceStatus;
    use crate::models::attendance::requests::NewAttendanceRecord;
    use crate::models::users::entities::UserRole;
    use crate::storage::Storage;
    use crate::test_utils::{seed_class, seed_user, setup_test_storage};

    fn day(d: u32) -> chrono::DateTime<chrono::Utc> {
        chrono::Utc.with_ymd_and_hms(2026, 3, d, 0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_mark_and_list_by_role() {
        let storage = setup_test_storage().await;
        let teacher = seed_user(&storage, "T", "t@school.test", UserRole::Teacher).await;
        let other = seed_user(&storage, "O", "o@school.test", UserRole::Teacher).await;
        let alice = seed_user(&storage, "Alice", "a@school.test", UserRole::Student).await;
        let bob = seed_user(&storage, "Bob", "b@school.test", UserRole::Student).await;
        let algebra = seed_class(&storage, teacher.id, "Algebra").await;
        let chemistry = seed_class(&storage, other.id, "Chemistry").await;

        let created = storage
            .mark_attendance(vec![
                NewAttendanceRecord {
                    student_id: alice.id,
                    class_id: algebra.id,
                    date: day(1),
                    status: AttendanceStatus::Present,
                },
                NewAttendanceRecord {
                    student_id: bob.id,
                    class_id: algebra.id,
                    date: day(2),
                    status: AttendanceStatus::Absent,
                },
                NewAttendanceRecord {
                    student_id: alice.id,
                    class_id: chemistry.id,
                    date: day(3),
                    status: AttendanceStatus::Present,
                },
            ])
            .await
            .unwrap();
        assert_eq!(created.len(), 3);
        assert_eq!(created[0].student.name, "Alice");
        assert_eq!(created[0].class.subject, "Math");

        let alice_records = storage.list_attendance_by_student(alice.id).await.unwrap();
        assert_eq!(alice_records.len(), 2);
        assert!(alice_records.iter().all(|r| r.record.student_id == alice.id));
        assert_eq!(alice_records[0].record.date, day(3));

        let teacher_records = storage.list_attendance_by_teacher(teacher.id).await.unwrap();
        assert_eq!(teacher_records.len(), 2);
        assert!(teacher_records.iter().all(|r| r.record.class_id == algebra.id));
    }

    #[tokio::test]
    async fn test_duplicates_accumulate() {
        let storage = setup_test_storage().await;
        let teacher = seed_user(&storage, "T", "t@school.test", UserRole::Teacher).await;
        let alice = seed_user(&storage, "Alice", "a@school.test", UserRole::Student).await;
        let class = seed_class(&storage, teacher.id, "Algebra").await;

        let record = NewAttendanceRecord {
            student_id: alice.id,
            class_id: class.id,
            date: day(1),
            status: AttendanceStatus::Present,
        };
        storage.mark_attendance(vec![record.clone()]).await.unwrap();
        storage.mark_attendance(vec![record]).await.unwrap();

        assert_eq!(storage.list_attendance_by_student(alice.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_reference_rolls_back_batch() {
        let storage = setup_test_storage().await;
        let teacher = seed_user(&storage, "T", "t@school.test", UserRole::Teacher).await;
        let alice = seed_user(&storage, "Alice", "a@school.test", UserRole::Student).await;
        let class = seed_class(&storage, teacher.id, "Algebra").await;

        let err = storage
            .mark_attendance(vec![
                NewAttendanceRecord {
                    student_id: alice.id,
                    class_id: class.id,
                    date: day(1),
                    status: AttendanceStatus::Present,
                },
                NewAttendanceRecord {
                    student_id: 9999,
                    class_id: class.id,
                    date: day(1),
                    status: AttendanceStatus::Present,
                },
            ])
            .await
            .unwrap_err();
        assert!(err.is_foreign_key_violation());
        assert!(storage.list_attendance_by_student(alice.id).await.unwrap().is_empty());
    }
}
