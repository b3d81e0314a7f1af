use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use crate::models::users::requests::CreateUserRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{Reply, bad_request, get_storage, respond, storage_error};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_name, validate_password_simple};

pub async fn handle_register(
    create_request: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(register(create_request, request).await)
}

async fn register(mut create_request: CreateUserRequest, request: &HttpRequest) -> Reply {
    let storage = get_storage(request)?;

    create_request.name = create_request.name.trim().to_string();
    create_request.email = create_request.email.trim().to_lowercase();

    validate_name(&create_request.name)
        .map_err(|msg| bad_request(ErrorCode::BadRequest, msg))?;
    validate_email(&create_request.email)
        .map_err(|msg| bad_request(ErrorCode::UserEmailInvalid, msg))?;
    validate_password_simple(&create_request.password)
        .map_err(|msg| bad_request(ErrorCode::UserPasswordInvalid, msg))?;

    match storage.get_user_by_email(&create_request.email).await {
        Ok(Some(_)) => {
            return Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserEmailAlreadyExists,
                "Email already exists",
            )));
        }
        Ok(None) => {}
        Err(e) => return Err(storage_error(ErrorCode::RegisterFailed, "Register failed", e)),
    }

    create_request.password = hash_password(&create_request.password).map_err(|e| {
        error!("Password hashing failed: {}", e);
        HttpResponse::InternalServerError().json(ApiResponse::server_error(
            ErrorCode::RegisterFailed,
            "Register failed",
            e,
        ))
    })?;

    // 并发注册同一邮箱时由唯一索引兜底，映射为 409
    let user = storage
        .create_user(create_request)
        .await
        .map_err(|e| storage_error(ErrorCode::RegisterFailed, "Register failed", e))?;

    info!("Registered {} {} ({})", user.role, user.id, user.email);
    Ok(HttpResponse::Created().json(ApiResponse::success(user, "Registration successful")))
}
