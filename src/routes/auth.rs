use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::middlewares::{self, RateLimit};
use crate::models::auth::requests::LoginRequest;
use crate::models::users::requests::CreateUserRequest;
use crate::services::AuthService;

static AUTH_SERVICE: AuthService = AuthService;

pub async fn login(
    req: HttpRequest,
    user_data: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login(user_data.into_inner(), &req).await
}

pub async fn refresh_token(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.refresh_token(&request).await
}

pub async fn register(
    req: HttpRequest,
    user_data: web::Json<CreateUserRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.register(user_data.into_inner(), &req).await
}

pub async fn me(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.me(&request).await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .service(
                web::resource("/login")
                    .route(web::post().to(login))
                    .wrap(RateLimit::login()),
            )
            .service(
                web::resource("/register")
                    .route(web::post().to(register))
                    .wrap(RateLimit::register()),
            )
            .service(
                web::resource("/refresh")
                    .route(web::post().to(refresh_token))
                    .wrap(RateLimit::refresh_token()),
            )
            .service(
                web::resource("/me")
                    .route(web::get().to(me))
                    .wrap(middlewares::RequireJWT),
            ),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{Value, json};

    use crate::models::users::entities::UserRole;
    use crate::test_utils::{
        bearer, init_test_app, seed_user, seed_user_with_password, setup_shared_storage,
        unique_peer_addr,
    };

    #[actix_web::test]
    async fn test_register_then_login() {
        let storage = setup_shared_storage().await;
        let app = init_test_app!(storage);
        let peer = unique_peer_addr();

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .peer_addr(peer)
            .set_json(json!({
                "name": "Ms. Frizzle",
                "email": "Frizzle@School.test",
                "password": "magicbus",
                "role": "teacher"
            }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["data"]["email"], "frizzle@school.test");
        assert!(body["data"].get("password_hash").is_none());

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .peer_addr(peer)
            .set_json(json!({"email": "frizzle@school.test", "password": "magicbus"}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.response().cookies().any(|c| c.name() == "refresh_token"));
        let body: Value = test::read_body_json(res).await;
        let token = body["data"]["access_token"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["data"]["user"]["role"], "teacher");
    }

    #[actix_web::test]
    async fn test_register_rejects_duplicate_email_and_unknown_role() {
        let storage = setup_shared_storage().await;
        seed_user(storage.as_ref(), "Taken", "taken@school.test", UserRole::Student).await;
        let app = init_test_app!(storage);
        let peer = unique_peer_addr();

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .peer_addr(peer)
            .set_json(json!({
                "name": "Again",
                "email": "taken@school.test",
                "password": "secret1",
                "role": "student"
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .peer_addr(peer)
            .set_json(json!({
                "name": "Root",
                "email": "root@school.test",
                "password": "secret1",
                "role": "admin"
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_login_wrong_password_and_rate_limit() {
        let storage = setup_shared_storage().await;
        seed_user_with_password(storage.as_ref(), "s@school.test", "right-pass", UserRole::Student)
            .await;
        let app = init_test_app!(storage);
        let peer = unique_peer_addr();

        for _ in 0..5 {
            let req = test::TestRequest::post()
                .uri("/api/auth/login")
                .peer_addr(peer)
                .set_json(json!({"email": "s@school.test", "password": "wrong-pass"}))
                .to_request();
            assert_eq!(
                test::call_service(&app, req).await.status(),
                StatusCode::UNAUTHORIZED
            );
        }

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .peer_addr(peer)
            .set_json(json!({"email": "s@school.test", "password": "right-pass"}))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[actix_web::test]
    async fn test_me_requires_valid_token() {
        let storage = setup_shared_storage().await;
        let student = seed_user(storage.as_ref(), "S", "s@school.test", UserRole::Student).await;
        let app = init_test_app!(storage);

        let req = test::TestRequest::get().uri("/api/auth/me").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(bearer(&student))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_refresh_issues_new_access_token() {
        let storage = setup_shared_storage().await;
        let teacher = seed_user(storage.as_ref(), "T", "t@school.test", UserRole::Teacher).await;
        let app = init_test_app!(storage);
        let refresh =
            crate::utils::jwt::JwtUtils::generate_refresh_token(teacher.id, teacher.role).unwrap();

        let req = test::TestRequest::post()
            .uri("/api/auth/refresh")
            .peer_addr(unique_peer_addr())
            .cookie(crate::utils::jwt::JwtUtils::create_refresh_token_cookie(&refresh))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        let token = body["data"]["access_token"].as_str().unwrap();
        assert!(crate::utils::jwt::JwtUtils::verify_access_token(token).is_ok());

        let req = test::TestRequest::post()
            .uri("/api/auth/refresh")
            .peer_addr(unique_peer_addr())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }
}
