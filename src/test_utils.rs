//! 测试辅助：内存数据库、种子数据与 HTTP 测试应用

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::models::assignments::entities::Assignment;
use crate::models::assignments::requests::NewAssignment;
use crate::models::classes::entities::Class;
use crate::models::classes::requests::CreateClassRequest;
use crate::models::users::entities::{User, UserRole};
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::storage::sea_orm_storage::SeaOrmStorage;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::hash_password;

pub(crate) async fn setup_test_storage() -> SeaOrmStorage {
    SeaOrmStorage::new_in_memory()
        .await
        .expect("in-memory database should start")
}

pub(crate) async fn setup_shared_storage() -> Arc<dyn Storage> {
    Arc::new(setup_test_storage().await)
}

pub(crate) async fn seed_user<S: Storage + ?Sized>(
    storage: &S,
    name: &str,
    email: &str,
    role: UserRole,
) -> User {
    storage
        .create_user(CreateUserRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: "not-a-hash".to_string(),
            role,
        })
        .await
        .expect("seed user")
}

/// 带真实密码哈希的用户，用于登录测试
pub(crate) async fn seed_user_with_password<S: Storage + ?Sized>(
    storage: &S,
    email: &str,
    password: &str,
    role: UserRole,
) -> User {
    storage
        .create_user(CreateUserRequest {
            name: "Login User".to_string(),
            email: email.to_string(),
            password: hash_password(password).expect("hash password"),
            role,
        })
        .await
        .expect("seed user")
}

pub(crate) async fn seed_class<S: Storage + ?Sized>(
    storage: &S,
    teacher_id: i64,
    name: &str,
) -> Class {
    storage
        .create_class(
            teacher_id,
            CreateClassRequest {
                name: name.to_string(),
                subject: "Math".to_string(),
                description: None,
                schedule: None,
            },
        )
        .await
        .expect("seed class")
}

/// 截止时间为当前时间加上 `due_in`
pub(crate) async fn seed_assignment<S: Storage + ?Sized>(
    storage: &S,
    class: &Class,
    title: &str,
    due_in: chrono::Duration,
) -> Assignment {
    storage
        .create_assignment(NewAssignment {
            class_id: class.id,
            teacher_id: class.teacher_id,
            title: title.to_string(),
            description: None,
            due_date: chrono::Utc::now() + due_in,
        })
        .await
        .expect("seed assignment")
}

pub(crate) fn bearer(user: &User) -> (&'static str, String) {
    let token = JwtUtils::generate_access_token(user.id, user.role).expect("sign token");
    ("Authorization", format!("Bearer {token}"))
}

/// 每次调用返回不同的客户端地址，避免测试之间共享限流计数
pub(crate) fn unique_peer_addr() -> SocketAddr {
    static NEXT: AtomicU32 = AtomicU32::new(1);
    let n = NEXT.fetch_add(1, Ordering::Relaxed);
    let [_, b, c, d] = n.to_be_bytes();
    SocketAddr::from(([10, b, c, d], 40000))
}

/// 挂载全部路由的测试应用
macro_rules! init_test_app {
    ($storage:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($storage.clone()))
                .app_data(actix_web::web::Data::new(
                    $crate::cache::create_object_cache(),
                ))
                .app_data(
                    actix_web::web::JsonConfig::default()
                        .error_handler($crate::utils::json_error_handler),
                )
                .app_data(
                    actix_web::web::QueryConfig::default()
                        .error_handler($crate::utils::query_error_handler),
                )
                .configure($crate::routes::configure_routes),
        )
        .await
    };
}

pub(crate) use init_test_app;
