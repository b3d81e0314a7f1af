use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::middlewares;
use crate::models::assignments::requests::{
    CreateAssignmentRequest, GradeSubmissionRequest, SubmitAssignmentRequest,
    UpdateAssignmentRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::AssignmentService;
use crate::utils::{SafeClassIdI64, SafeIDI64, SafeSubmissionIdI64};

static ASSIGNMENT_SERVICE: AssignmentService = AssignmentService;

pub async fn list_assignments(req: HttpRequest) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.list_assignments(&req).await
}

pub async fn list_assignments_by_class(
    req: HttpRequest,
    class_id: SafeClassIdI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .list_assignments_by_class(&req, class_id.0)
        .await
}

pub async fn create_assignment(
    req: HttpRequest,
    body: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .create_assignment(&req, body.into_inner())
        .await
}

pub async fn update_assignment(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .update_assignment(&req, id.0, body.into_inner())
        .await
}

pub async fn delete_assignment(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.delete_assignment(&req, id.0).await
}

pub async fn submit_assignment(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<SubmitAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .submit_assignment(&req, id.0, body.into_inner())
        .await
}

pub async fn grade_submission(
    req: HttpRequest,
    id: SafeIDI64,
    submission_id: SafeSubmissionIdI64,
    body: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .grade_submission(&req, id.0, submission_id.0, body.into_inner())
        .await
}

// 配置路由
pub fn configure_assignments_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/assignments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_assignments))
                    .route(
                        web::post()
                            .to(create_assignment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            // 必须在 /{id} 之前注册
            .service(
                web::resource("/class/{class_id}").route(web::get().to(list_assignments_by_class)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::put().to(update_assignment))
                    .route(web::delete().to(delete_assignment))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .service(
                web::resource("/{id}/submit")
                    .route(web::post().to(submit_assignment))
                    .wrap(middlewares::RequireRole::new(&UserRole::Student)),
            )
            .service(
                web::resource("/{id}/submissions/{submission_id}/grade")
                    .route(web::put().to(grade_submission))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            ),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{Value, json};

    use crate::models::users::entities::UserRole;
    use crate::storage::Storage;
    use crate::test_utils::{
        bearer, init_test_app, seed_assignment, seed_class, seed_user, setup_shared_storage,
    };

    #[actix_web::test]
    async fn test_end_to_end_class_assignment_submission() {
        let storage = setup_shared_storage().await;
        let teacher = seed_user(storage.as_ref(), "T", "t@school.test", UserRole::Teacher).await;
        let student = seed_user(storage.as_ref(), "S", "s@school.test", UserRole::Student).await;
        let classmate = seed_user(storage.as_ref(), "C", "c@school.test", UserRole::Student).await;
        let app = init_test_app!(storage);

        let req = test::TestRequest::post()
            .uri("/api/classes")
            .insert_header(bearer(&teacher))
            .set_json(json!({"name": "Algebra", "subject": "Math"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let class_id = body["data"]["id"].as_i64().unwrap();

        for email in ["s@school.test", "c@school.test"] {
            let req = test::TestRequest::post()
                .uri(&format!("/api/classes/{class_id}/students"))
                .insert_header(bearer(&teacher))
                .set_json(json!({ "email": email }))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        }

        let tomorrow = (chrono::Utc::now() + chrono::Duration::days(1)).to_rfc3339();
        let req = test::TestRequest::post()
            .uri("/api/assignments")
            .insert_header(bearer(&teacher))
            .set_json(json!({"title": "HW1", "class": class_id, "dueDate": tomorrow}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        let assignment_id = body["data"]["id"].as_i64().unwrap();

        for (who, content) in [(&student, "done"), (&classmate, "mine")] {
            let req = test::TestRequest::post()
                .uri(&format!("/api/assignments/{assignment_id}/submit"))
                .insert_header(bearer(who))
                .set_json(json!({ "submission": content }))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::get()
            .uri("/api/assignments")
            .insert_header(bearer(&teacher))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let items = body["data"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["submissions"].as_array().unwrap().len(), 2);
        assert_eq!(items[0]["class"]["name"], "Algebra");

        let req = test::TestRequest::get()
            .uri("/api/assignments")
            .insert_header(bearer(&student))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let submissions = body["data"]["items"][0]["submissions"].as_array().unwrap().clone();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0]["student_id"], student.id);
        assert_eq!(submissions[0]["content"], "done");

        // listByClass 对学生同样只显示自己的提交
        let req = test::TestRequest::get()
            .uri(&format!("/api/assignments/class/{class_id}"))
            .insert_header(bearer(&classmate))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let submissions = body["data"]["items"][0]["submissions"].as_array().unwrap().clone();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0]["content"], "mine");
    }

    #[actix_web::test]
    async fn test_resubmission_returns_ok_and_keeps_one_row() {
        let storage = setup_shared_storage().await;
        let teacher = seed_user(storage.as_ref(), "T", "t@school.test", UserRole::Teacher).await;
        let student = seed_user(storage.as_ref(), "S", "s@school.test", UserRole::Student).await;
        let class = seed_class(storage.as_ref(), teacher.id, "Algebra").await;
        storage.add_student_to_class(class.id, student.id).await.unwrap();
        let hw = seed_assignment(storage.as_ref(), &class, "HW1", chrono::Duration::days(1)).await;
        let app = init_test_app!(storage);
        let uri = format!("/api/assignments/{}/submit", hw.id);

        let mut ids = Vec::new();
        for (content, status) in [("v1", StatusCode::CREATED), ("v2", StatusCode::OK)] {
            let req = test::TestRequest::post()
                .uri(&uri)
                .insert_header(bearer(&student))
                .set_json(json!({ "content": content }))
                .to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), status);
            let body: Value = test::read_body_json(res).await;
            ids.push(body["data"]["id"].as_i64().unwrap());
        }
        assert_eq!(ids[0], ids[1]);

        let detail = storage
            .get_assignment_detail(
                hw.id,
                crate::models::assignments::entities::SubmissionVisibility::All,
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.submissions.len(), 1);
        assert_eq!(detail.submissions[0].submission.content, "v2");

        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(bearer(&student))
            .set_json(json!({ "content": "   " }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_simultaneous_first_submissions_create_once() {
        let storage = setup_shared_storage().await;
        let teacher = seed_user(storage.as_ref(), "T", "t@school.test", UserRole::Teacher).await;
        let student = seed_user(storage.as_ref(), "S", "s@school.test", UserRole::Student).await;
        let class = seed_class(storage.as_ref(), teacher.id, "Algebra").await;
        storage.add_student_to_class(class.id, student.id).await.unwrap();
        let hw = seed_assignment(storage.as_ref(), &class, "HW1", chrono::Duration::days(1)).await;
        let app = init_test_app!(storage);
        let uri = format!("/api/assignments/{}/submit", hw.id);

        let submit = |content: &str| {
            test::TestRequest::post()
                .uri(&uri)
                .insert_header(bearer(&student))
                .set_json(json!({ "content": content }))
                .to_request()
        };
        let (a, b) = futures_util::join!(
            test::call_service(&app, submit("one")),
            test::call_service(&app, submit("two")),
        );

        let mut statuses = [a.status(), b.status()];
        statuses.sort_by_key(|s| s.as_u16());
        assert_eq!(statuses, [StatusCode::OK, StatusCode::CREATED]);

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

    #[actix_web::test]
    async fn test_submit_requires_enrollment_and_student_role() {
        let storage = setup_shared_storage().await;
        let teacher = seed_user(storage.as_ref(), "T", "t@school.test", UserRole::Teacher).await;
        let outsider = seed_user(storage.as_ref(), "O", "o@school.test", UserRole::Student).await;
        let class = seed_class(storage.as_ref(), teacher.id, "Algebra").await;
        let hw = seed_assignment(storage.as_ref(), &class, "HW1", chrono::Duration::days(1)).await;
        let app = init_test_app!(storage);

        let req = test::TestRequest::post()
            .uri(&format!("/api/assignments/{}/submit", hw.id))
            .insert_header(bearer(&outsider))
            .set_json(json!({ "content": "let me in" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri(&format!("/api/assignments/{}/submit", hw.id))
            .insert_header(bearer(&teacher))
            .set_json(json!({ "content": "teacher answer" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri("/api/assignments/9999/submit")
            .insert_header(bearer(&outsider))
            .set_json(json!({ "content": "x" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_create_requires_class_ownership() {
        let storage = setup_shared_storage().await;
        let owner = seed_user(storage.as_ref(), "Owner", "owner@school.test", UserRole::Teacher).await;
        let other = seed_user(storage.as_ref(), "Other", "other@school.test", UserRole::Teacher).await;
        let class = seed_class(storage.as_ref(), owner.id, "Algebra").await;
        let app = init_test_app!(storage);

        let req = test::TestRequest::post()
            .uri("/api/assignments")
            .insert_header(bearer(&other))
            .set_json(json!({"title": "HW", "classId": class.id, "dueDate": "2030-01-01"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post()
            .uri("/api/assignments")
            .insert_header(bearer(&owner))
            .set_json(json!({"title": "HW", "classId": 9999, "dueDate": "2030-01-01"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::post()
            .uri("/api/assignments")
            .insert_header(bearer(&owner))
            .set_json(json!({"title": "HW", "classId": class.id, "dueDate": "someday"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_delete_assignment_removes_submissions() {
        let storage = setup_shared_storage().await;
        let owner = seed_user(storage.as_ref(), "Owner", "owner@school.test", UserRole::Teacher).await;
        let other = seed_user(storage.as_ref(), "Other", "other@school.test", UserRole::Teacher).await;
        let student = seed_user(storage.as_ref(), "S", "s@school.test", UserRole::Student).await;
        let class = seed_class(storage.as_ref(), owner.id, "Algebra").await;
        storage.add_student_to_class(class.id, student.id).await.unwrap();
        let hw = seed_assignment(storage.as_ref(), &class, "HW1", chrono::Duration::days(1)).await;
        let submission = storage
            .upsert_submission(hw.id, student.id, "done")
            .await
            .unwrap()
            .submission;
        let app = init_test_app!(storage);
        let uri = format!("/api/assignments/{}", hw.id);

        let req = test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bearer(&other))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bearer(&owner))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        assert!(storage.get_submission_by_id(submission.id).await.unwrap().is_none());

        let req = test::TestRequest::get()
            .uri(&format!("/api/assignments/class/{}", class.id))
            .insert_header(bearer(&student))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["items"], json!([]));
    }

    #[actix_web::test]
    async fn test_update_and_grade() {
        let storage = setup_shared_storage().await;
        let owner = seed_user(storage.as_ref(), "Owner", "owner@school.test", UserRole::Teacher).await;
        let other = seed_user(storage.as_ref(), "Other", "other@school.test", UserRole::Teacher).await;
        let student = seed_user(storage.as_ref(), "S", "s@school.test", UserRole::Student).await;
        let class = seed_class(storage.as_ref(), owner.id, "Algebra").await;
        storage.add_student_to_class(class.id, student.id).await.unwrap();
        let hw = seed_assignment(storage.as_ref(), &class, "HW1", chrono::Duration::days(1)).await;
        let submission = storage
            .upsert_submission(hw.id, student.id, "done")
            .await
            .unwrap()
            .submission;
        let app = init_test_app!(storage);

        let req = test::TestRequest::put()
            .uri(&format!("/api/assignments/{}", hw.id))
            .insert_header(bearer(&other))
            .set_json(json!({"title": "Mine now"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::put()
            .uri(&format!("/api/assignments/{}", hw.id))
            .insert_header(bearer(&owner))
            .set_json(json!({"title": "HW1 (revised)", "dueDate": "2030-06-01"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["title"], "HW1 (revised)");
        assert!(body["data"]["due_date"].as_str().unwrap().starts_with("2030-06-01"));

        let grade_uri = format!(
            "/api/assignments/{}/submissions/{}/grade",
            hw.id, submission.id
        );
        let req = test::TestRequest::put()
            .uri(&grade_uri)
            .insert_header(bearer(&owner))
            .set_json(json!({"grade": 140.0}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::put()
            .uri(&grade_uri)
            .insert_header(bearer(&owner))
            .set_json(json!({"grade": 93.5, "feedback": "Nice work"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["grade"], 93.5);
        assert_eq!(body["data"]["feedback"], "Nice work");

        let req = test::TestRequest::put()
            .uri(&format!("/api/assignments/{}/submissions/9999/grade", hw.id))
            .insert_header(bearer(&owner))
            .set_json(json!({"grade": 50.0}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}
