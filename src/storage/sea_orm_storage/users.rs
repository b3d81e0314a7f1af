use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{Result, SchoolError};
use crate::models::users::{
    entities::{User, UserSummary},
    requests::CreateUserRequest,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("创建用户失败", e))?;

        result.into_user()
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("查询用户失败", e))?;

        result.map(|m| m.into_user()).transpose()
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("查询用户失败", e))?;

        result.map(|m| m.into_user()).transpose()
    }

    /// 批量加载用户摘要，用于填充班级、作业、考勤中的用户信息
    pub(super) async fn load_user_summaries(
        &self,
        ids: impl IntoIterator<Item = i64>,
    ) -> Result<HashMap<i64, UserSummary>> {
        let mut ids: Vec<i64> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let users = Users::find()
            .filter(Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::from_db("查询用户列表失败", e))?;

        Ok(users.iter().map(|u| (u.id, u.summary())).collect())
    }
}

/// 缺失的用户（已被删除）以占位摘要代替
pub(super) fn summary_or_placeholder(map: &HashMap<i64, UserSummary>, id: i64) -> UserSummary {
    map.get(&id).cloned().unwrap_or(UserSummary {
        id,
        name: String::new(),
        email: String::new(),
    })
}
