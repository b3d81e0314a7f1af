pub mod create;
pub mod delete;
pub mod list;
pub mod students;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::classes::entities::{Class, ClassDetail};
use crate::models::classes::requests::{AddStudentRequest, CreateClassRequest, UpdateClassRequest};
use crate::models::users::entities::User;
use crate::services::{not_found, not_owner, storage_error};
use crate::storage::Storage;

pub struct ClassService;

impl ClassService {
    // 当前用户的班级列表
    pub async fn list_classes(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_classes(request).await
    }

    pub async fn create_class(
        &self,
        request: &HttpRequest,
        class_data: CreateClassRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_class(request, class_data).await
    }

    // 更新班级信息，仅班级教师
    pub async fn update_class(
        &self,
        request: &HttpRequest,
        class_id: i64,
        update_data: UpdateClassRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_class(request, class_id, update_data).await
    }

    // 删除班级及其下属数据，仅班级教师
    pub async fn delete_class(
        &self,
        request: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_class(request, class_id).await
    }

    pub async fn add_student(
        &self,
        request: &HttpRequest,
        class_id: i64,
        body: AddStudentRequest,
    ) -> ActixResult<HttpResponse> {
        students::add_student(request, class_id, body).await
    }

    pub async fn remove_student(
        &self,
        request: &HttpRequest,
        class_id: i64,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        students::remove_student(request, class_id, student_id).await
    }
}

/// 读取班级并确认当前用户是该班级的教师：不存在 404，不是所有者 401
pub(crate) async fn load_owned_class(
    storage: &Arc<dyn Storage>,
    class_id: i64,
    user: &User,
) -> Result<Class, HttpResponse> {
    let class = storage
        .get_class_by_id(class_id)
        .await
        .map_err(|e| storage_error(ErrorCode::ClassNotFound, "Failed to load class", e))?
        .ok_or_else(|| not_found(ErrorCode::ClassNotFound, "Class not found"))?;

    if class.teacher_id != user.id {
        tracing::info!(
            "User {} attempted to modify class {} owned by {}",
            user.id,
            class.id,
            class.teacher_id
        );
        return Err(not_owner(
            ErrorCode::ClassPermissionDenied,
            "You are not the teacher of this class",
        ));
    }

    Ok(class)
}

/// 变更之后重新读取带教师与学生信息的班级
pub(crate) async fn load_class_detail(
    storage: &Arc<dyn Storage>,
    class_id: i64,
) -> Result<ClassDetail, HttpResponse> {
    storage
        .get_class_detail(class_id)
        .await
        .map_err(|e| storage_error(ErrorCode::ClassNotFound, "Failed to load class", e))?
        .ok_or_else(|| not_found(ErrorCode::ClassNotFound, "Class not found"))
}
