//! Auth API tests
//!
//! 登录 / token 校验 / 密码重置流程，跑在临时 SQLite 上。
//! 邮件走未配置（停用）的 Mailer，重置 token 直接从库里取。

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use std::sync::Arc;
use tempfile::TempDir;

use folio_backend::analytics::{MetricStore, MetricsRecorder};
use folio_backend::api::services::routes;
use folio_backend::config::MailConfig;
use folio_backend::mail::Mailer;
use folio_backend::services::AuthService;
use folio_backend::storage::SeaOrmStorage;
use folio_backend::utils::password::hash_password;

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "correct horse battery";

async fn create_test_env() -> (Arc<SeaOrmStorage>, Arc<AuthService>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = Arc::new(
        SeaOrmStorage::new(&db_url, "sqlite")
            .await
            .expect("Failed to create storage"),
    );

    let hash = hash_password(ADMIN_PASSWORD).expect("hash");
    storage
        .create_user(ADMIN_EMAIL, &hash, "ADMIN")
        .await
        .expect("create admin");

    let store: Arc<dyn MetricStore> = storage.clone();
    let recorder = Arc::new(MetricsRecorder::new(store));
    let mailer = Arc::new(Mailer::new(MailConfig::default(), recorder));
    let auth_service = Arc::new(AuthService::new(storage.clone(), mailer));

    (storage, auth_service, temp_dir)
}

macro_rules! auth_app {
    ($storage:expr, $auth_service:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($storage.clone()))
                .app_data(web::Data::new($auth_service.clone()))
                .service(routes::auth_routes()),
        )
        .await
    };
}

#[actix_web::test]
async fn test_login_success_returns_token_pair() {
    let (storage, auth_service, _dir) = create_test_env().await;
    let app = auth_app!(storage, auth_service);

    let req = TestRequest::post()
        .uri("/auth/login")
        .set_json(serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 0);
    assert!(body["data"]["accessToken"].as_str().is_some());
    assert!(body["data"]["refreshToken"].as_str().is_some());
    assert!(body["data"]["expiresIn"].as_u64().unwrap() > 0);
}

#[actix_web::test]
async fn test_login_wrong_password_rejected() {
    let (storage, auth_service, _dir) = create_test_env().await;
    let app = auth_app!(storage, auth_service);

    let req = TestRequest::post()
        .uri("/auth/login")
        .set_json(serde_json::json!({ "email": ADMIN_EMAIL, "password": "wrong" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_login_unknown_email_rejected() {
    let (storage, auth_service, _dir) = create_test_env().await;
    let app = auth_app!(storage, auth_service);

    let req = TestRequest::post()
        .uri("/auth/login")
        .set_json(serde_json::json!({ "email": "nobody@example.com", "password": "x" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_verify_requires_bearer_token() {
    let (storage, auth_service, _dir) = create_test_env().await;
    let app = auth_app!(storage, auth_service);

    let req = TestRequest::get().uri("/auth/verify").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_login_then_verify_and_me() {
    let (storage, auth_service, _dir) = create_test_env().await;
    let app = auth_app!(storage, auth_service);

    let req = TestRequest::post()
        .uri("/auth/login")
        .set_json(serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    let token = body["data"]["accessToken"].as_str().expect("token").to_string();

    let req = TestRequest::get()
        .uri("/auth/verify")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = TestRequest::get()
        .uri("/auth/me")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["email"], ADMIN_EMAIL);
    // 密码哈希绝不能出现在响应里
    assert!(body["data"].get("password").is_none());
}

#[actix_web::test]
async fn test_refresh_returns_new_pair() {
    let (storage, auth_service, _dir) = create_test_env().await;
    let app = auth_app!(storage, auth_service);

    let req = TestRequest::post()
        .uri("/auth/login")
        .set_json(serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    let refresh = body["data"]["refreshToken"].as_str().expect("refresh");

    let req = TestRequest::post()
        .uri("/auth/refresh")
        .set_json(serde_json::json!({ "refreshToken": refresh }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["data"]["accessToken"].as_str().is_some());
}

#[actix_web::test]
async fn test_refresh_rejects_access_token() {
    let (storage, auth_service, _dir) = create_test_env().await;
    let app = auth_app!(storage, auth_service);

    let req = TestRequest::post()
        .uri("/auth/login")
        .set_json(serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    let access = body["data"]["accessToken"].as_str().expect("access");

    let req = TestRequest::post()
        .uri("/auth/refresh")
        .set_json(serde_json::json!({ "refreshToken": access }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_password_reset_request_is_generic() {
    let (storage, auth_service, _dir) = create_test_env().await;
    let app = auth_app!(storage, auth_service);

    // 存在与不存在的账号拿到同样的 200 响应
    for email in [ADMIN_EMAIL, "nobody@example.com"] {
        let req = TestRequest::post()
            .uri("/auth/password-reset/request")
            .set_json(serde_json::json!({ "email": email }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success(), "email {}", email);
    }
}

#[actix_web::test]
async fn test_password_reset_with_bad_token_rejected() {
    let (storage, auth_service, _dir) = create_test_env().await;
    let app = auth_app!(storage, auth_service);

    let req = TestRequest::post()
        .uri("/auth/password-reset/confirm")
        .set_json(serde_json::json!({ "token": "bogus", "newPassword": "new password 123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_password_reset_full_flow() {
    let (storage, auth_service, _dir) = create_test_env().await;
    let app = auth_app!(storage, auth_service);

    // 直接往库里放一个重置 token（邮件在测试环境停用）
    let user = storage
        .user_by_email(ADMIN_EMAIL)
        .await
        .expect("query")
        .expect("user");
    let expires = chrono::Utc::now() + chrono::Duration::minutes(30);
    storage
        .set_reset_token(user, "reset-token-123", expires)
        .await
        .expect("set token");

    let req = TestRequest::post()
        .uri("/auth/password-reset/confirm")
        .set_json(serde_json::json!({
            "token": "reset-token-123",
            "newPassword": "brand new password"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    // 旧密码失效，新密码可登录
    let req = TestRequest::post()
        .uri("/auth/login")
        .set_json(serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = TestRequest::post()
        .uri("/auth/login")
        .set_json(serde_json::json!({ "email": ADMIN_EMAIL, "password": "brand new password" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    // token 一次性，复用失败
    let req = TestRequest::post()
        .uri("/auth/password-reset/confirm")
        .set_json(serde_json::json!({
            "token": "reset-token-123",
            "newPassword": "another password"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
