use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use crate::models::auth::{requests::LoginRequest, responses::LoginResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{Reply, get_storage, respond, storage_error};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

fn invalid_credentials() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::AuthFailed,
        "Email or password is incorrect",
    ))
}

pub async fn handle_login(
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(login(login_request, request).await)
}

async fn login(login_request: LoginRequest, request: &HttpRequest) -> Reply {
    let storage = get_storage(request)?;
    let email = login_request.email.trim().to_lowercase();

    let user = match storage.get_user_by_email(&email).await {
        Ok(Some(user)) => user,
        Ok(None) => return Err(invalid_credentials()),
        Err(e) => return Err(storage_error(ErrorCode::AuthFailed, "Login failed", e)),
    };

    if !verify_password(&login_request.password, &user.password_hash) {
        info!("Failed login attempt for {}", email);
        return Err(invalid_credentials());
    }

    let token_pair = JwtUtils::generate_token_pair(user.id, user.role).map_err(|e| {
        error!("Failed to generate JWT token: {}", e);
        HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::InternalServerError,
            "Login failed, unable to generate token",
        ))
    })?;

    info!("User {} logged in successfully", user.id);

    let refresh_cookie = JwtUtils::create_refresh_token_cookie(&token_pair.refresh_token);
    let response = LoginResponse {
        access_token: token_pair.access_token,
        expires_in: JwtUtils::access_token_ttl_secs(),
        user,
    };

    Ok(HttpResponse::Ok()
        .cookie(refresh_cookie)
        .json(ApiResponse::success(response, "Login successful")))
}
