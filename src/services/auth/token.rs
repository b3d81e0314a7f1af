use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use crate::models::auth::responses::{RefreshTokenResponse, UserInfoResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{Reply, current_user, get_storage, respond, storage_error};
use crate::utils::jwt::JwtUtils;

fn login_required(message: &str) -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(ErrorCode::Unauthorized, message))
}

pub async fn handle_refresh_token(request: &HttpRequest) -> ActixResult<HttpResponse> {
    respond(refresh(request).await)
}

async fn refresh(request: &HttpRequest) -> Reply {
    let refresh_token = JwtUtils::extract_refresh_token_from_cookie(request)
        .ok_or_else(|| login_required("Unauthorized access, please login"))?;

    let claims = JwtUtils::verify_refresh_token(&refresh_token).map_err(|e| {
        info!("Refresh token rejected: {}", e);
        login_required("Login expired or invalid, please login again")
    })?;
    let user_id = claims
        .user_id()
        .ok_or_else(|| login_required("Login expired or invalid, please login again"))?;

    // 以存储中的角色签发，而不是沿用旧 token 中的角色
    let storage = get_storage(request)?;
    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return Err(login_required("User no longer exists")),
        Err(e) => return Err(storage_error(ErrorCode::AuthFailed, "Token refresh failed", e)),
    };

    let access_token = JwtUtils::generate_access_token(user.id, user.role).map_err(|e| {
        error!("Failed to generate JWT token: {}", e);
        HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::InternalServerError,
            "Unable to generate token",
        ))
    })?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        RefreshTokenResponse {
            access_token,
            expires_in: JwtUtils::access_token_ttl_secs(),
        },
        "Token refreshed successfully",
    )))
}

pub async fn handle_get_user(request: &HttpRequest) -> ActixResult<HttpResponse> {
    respond(current_user(request).map(|user| {
        HttpResponse::Ok().json(ApiResponse::success(
            UserInfoResponse { user },
            "User information retrieved successfully",
        ))
    }))
}
