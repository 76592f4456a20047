//! Metrics API and middleware tests
//!
//! 走 actix 测试服务：中间件的路径过滤 / CV 归一化 / 爬虫分类，
//! 以及显式上报端点的校验与失败吞咽。

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, HttpResponse, web};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tempfile::TempDir;

use folio_backend::analytics::{MetricStore, MetricsRecorder};
use folio_backend::api::middleware::TrafficMetrics;
use folio_backend::api::services::routes;
use folio_backend::services::MetricsQueryService;
use folio_backend::storage::SeaOrmStorage;
use folio_backend::storage::models::MetricRecord;

async fn create_temp_storage() -> (Arc<SeaOrmStorage>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = SeaOrmStorage::new(&db_url, "sqlite")
        .await
        .expect("Failed to create storage");

    (Arc::new(storage), temp_dir)
}

fn recorder_for(storage: &Arc<SeaOrmStorage>) -> Arc<MetricsRecorder> {
    let store: Arc<dyn MetricStore> = storage.clone();
    Arc::new(MetricsRecorder::new(store))
}

async fn ok_handler() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

/// 带指标中间件的最小应用：几条代表性业务路由
macro_rules! instrumented_app {
    ($recorder:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($recorder.clone()))
                .wrap(TrafficMetrics)
                .route("/about", web::get().to(ok_handler))
                .route("/cv", web::get().to(ok_handler))
                .route("/cv/download", web::get().to(ok_handler))
                .route("/styles/app.css", web::get().to(ok_handler))
                .route("/metrics/ping", web::get().to(ok_handler)),
        )
        .await
    };
}

#[actix_web::test]
async fn test_asset_path_produces_no_record() {
    let (storage, _dir) = create_temp_storage().await;
    let recorder = recorder_for(&storage);
    let app = instrumented_app!(recorder);

    let req = TestRequest::get().uri("/styles/app.css").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    assert_eq!(storage.count_metrics(None).await.unwrap(), 0);
}

#[actix_web::test]
async fn test_metrics_prefix_produces_no_record() {
    let (storage, _dir) = create_temp_storage().await;
    let recorder = recorder_for(&storage);
    let app = instrumented_app!(recorder);

    let req = TestRequest::get().uri("/metrics/ping").to_request();
    test::call_service(&app, req).await;

    assert_eq!(storage.count_metrics(None).await.unwrap(), 0);
}

#[actix_web::test]
async fn test_plain_visit_recorded() {
    let (storage, _dir) = create_temp_storage().await;
    let recorder = recorder_for(&storage);
    let app = instrumented_app!(recorder);

    let req = TestRequest::get()
        .uri("/about")
        .insert_header(("user-agent", "Mozilla/5.0 (X11; Linux x86_64)"))
        .insert_header(("x-forwarded-for", "203.0.113.7, 10.0.0.1"))
        .to_request();
    test::call_service(&app, req).await;

    let metrics = storage
        .metrics_filtered(Default::default())
        .await
        .expect("query");
    assert_eq!(metrics.len(), 1);
    assert_eq!(metrics[0].metric_type, "VISIT");
    assert_eq!(metrics[0].path, "/about");
    assert_eq!(metrics[0].ip_address.as_deref(), Some("203.0.113.7"));
    let metadata = metrics[0].metadata.as_ref().expect("metadata");
    assert_eq!(metadata["isBot"], false);
}

#[actix_web::test]
async fn test_bot_request_recorded_as_bot() {
    let (storage, _dir) = create_temp_storage().await;
    let recorder = recorder_for(&storage);
    let app = instrumented_app!(recorder);

    let req = TestRequest::get()
        .uri("/about")
        .insert_header(("user-agent", "Googlebot/2.1 (+http://www.google.com/bot.html)"))
        .insert_header(("x-forwarded-for", "203.0.113.8"))
        .to_request();
    test::call_service(&app, req).await;

    let metrics = storage
        .metrics_filtered(Default::default())
        .await
        .expect("query");
    assert_eq!(metrics.len(), 1);
    assert_eq!(metrics[0].metric_type, "BOT");
    let metadata = metrics[0].metadata.as_ref().expect("metadata");
    assert_eq!(metadata["isBot"], true);
    assert_eq!(metadata["botType"], "Googlebot");
}

#[actix_web::test]
async fn test_cv_download_canonicalized_even_for_bots() {
    let (storage, _dir) = create_temp_storage().await;
    let recorder = recorder_for(&storage);
    let app = instrumented_app!(recorder);

    let req = TestRequest::get()
        .uri("/cv/download")
        .insert_header(("user-agent", "Googlebot/2.1"))
        .insert_header(("x-forwarded-for", "203.0.113.9"))
        .to_request();
    test::call_service(&app, req).await;

    let metrics = storage
        .metrics_filtered(Default::default())
        .await
        .expect("query");
    assert_eq!(metrics.len(), 1);
    // CV 访问优先于爬虫分类
    assert_eq!(metrics[0].metric_type, "CV_VISIT");
    assert_eq!(metrics[0].path, "/cv");
    let metadata = metrics[0].metadata.as_ref().expect("metadata");
    assert_eq!(metadata["originalPath"], "/cv/download");
    assert_eq!(metadata["cvAccess"], true);
    assert_eq!(metadata["isBot"], true);
}

#[actix_web::test]
async fn test_middleware_failure_does_not_break_request() {
    struct FailingStore;

    #[async_trait]
    impl MetricStore for FailingStore {
        async fn insert_metric(&self, _record: MetricRecord) -> anyhow::Result<MetricRecord> {
            anyhow::bail!("database offline")
        }

        async fn find_metric_in_window(
            &self,
            _metric_type: &str,
            _ip_address: &str,
            _day_start: DateTime<Utc>,
            _day_end: DateTime<Utc>,
        ) -> anyhow::Result<Option<MetricRecord>> {
            anyhow::bail!("database offline")
        }
    }

    let store: Arc<dyn MetricStore> = Arc::new(FailingStore);
    let recorder = Arc::new(MetricsRecorder::new(store));
    let app = instrumented_app!(recorder);

    let req = TestRequest::get()
        .uri("/about")
        .insert_header(("x-forwarded-for", "203.0.113.9"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // 指标写入失败，请求本身不受影响
    assert!(resp.status().is_success());
}

// ============ 显式上报端点 ============

#[actix_web::test]
async fn test_post_metric_with_unknown_type_is_rejected() {
    let (storage, _dir) = create_temp_storage().await;
    let recorder = recorder_for(&storage);
    let query_service = Arc::new(MetricsQueryService::new(storage.clone()));

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(recorder.clone()))
            .app_data(web::Data::new(query_service.clone()))
            .service(routes::metrics_routes()),
    )
    .await;

    let req = TestRequest::post()
        .uri("/metrics")
        .set_json(serde_json::json!({ "type": "PAGEVIEW", "path": "/" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(storage.count_metrics(None).await.unwrap(), 0);
}

#[actix_web::test]
async fn test_post_metric_creates_record() {
    let (storage, _dir) = create_temp_storage().await;
    let recorder = recorder_for(&storage);
    let query_service = Arc::new(MetricsQueryService::new(storage.clone()));

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(recorder.clone()))
            .app_data(web::Data::new(query_service.clone()))
            .service(routes::metrics_routes()),
    )
    .await;

    let req = TestRequest::post()
        .uri("/metrics")
        .set_json(serde_json::json!({
            "type": "CV_CLICK",
            "path": "/cv",
            "ipAddress": "203.0.113.4",
            "metadata": { "cvId": "abc" }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["type"], "CV_CLICK");
    assert_eq!(body["data"]["path"], "/cv");

    assert_eq!(storage.count_metrics(Some("CV_CLICK")).await.unwrap(), 1);
}

#[actix_web::test]
async fn test_track_visit_endpoint_swallows_store_failure() {
    struct FailingStore;

    #[async_trait]
    impl MetricStore for FailingStore {
        async fn insert_metric(&self, _record: MetricRecord) -> anyhow::Result<MetricRecord> {
            anyhow::bail!("database offline")
        }

        async fn find_metric_in_window(
            &self,
            _metric_type: &str,
            _ip_address: &str,
            _day_start: DateTime<Utc>,
            _day_end: DateTime<Utc>,
        ) -> anyhow::Result<Option<MetricRecord>> {
            anyhow::bail!("database offline")
        }
    }

    let store: Arc<dyn MetricStore> = Arc::new(FailingStore);
    let recorder = Arc::new(MetricsRecorder::new(store));

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(recorder.clone()))
            .service(routes::metrics_routes()),
    )
    .await;

    let req = TestRequest::post()
        .uri("/metrics/visit")
        .set_json(serde_json::json!({ "path": "/", "ipAddress": "203.0.113.4" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["skipped"], true);
    assert_eq!(body["data"]["reason"], "Error tracking visit");
}

#[actix_web::test]
async fn test_cv_click_endpoint_records_from_request_context() {
    let (storage, _dir) = create_temp_storage().await;
    let recorder = recorder_for(&storage);
    let query_service = Arc::new(MetricsQueryService::new(storage.clone()));

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(recorder.clone()))
            .app_data(web::Data::new(query_service.clone()))
            .service(routes::metrics_routes()),
    )
    .await;

    let req = TestRequest::post()
        .uri("/metrics/cv-click")
        .insert_header(("user-agent", "Mozilla/5.0"))
        .insert_header(("x-forwarded-for", "203.0.113.4"))
        .set_json(serde_json::json!({ "cvId": "cv-1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let clicks = storage
        .metrics_filtered(folio_backend::storage::MetricFilter {
            metric_type: Some("CV_CLICK"),
            ..Default::default()
        })
        .await
        .expect("query");
    assert_eq!(clicks.len(), 1);
    assert_eq!(clicks[0].path, "/cv");
    assert_eq!(clicks[0].ip_address.as_deref(), Some("203.0.113.4"));
    let metadata = clicks[0].metadata.as_ref().expect("metadata");
    assert_eq!(metadata["cvId"], "cv-1");
    assert_eq!(metadata["isClick"], true);
}

#[actix_web::test]
async fn test_metric_reads_require_authentication() {
    let (storage, _dir) = create_temp_storage().await;
    let recorder = recorder_for(&storage);
    let query_service = Arc::new(MetricsQueryService::new(storage.clone()));

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(recorder.clone()))
            .app_data(web::Data::new(query_service.clone()))
            .service(routes::metrics_routes()),
    )
    .await;

    for uri in [
        "/metrics",
        "/metrics/count",
        "/metrics/bots",
        "/metrics/real-users/count",
        "/metrics/unique-users/count",
    ] {
        let req = TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "uri {}", uri);
    }
}

#[actix_web::test]
async fn test_unique_users_count_with_invalid_date_is_rejected() {
    let (storage, _dir) = create_temp_storage().await;
    let recorder = recorder_for(&storage);
    let query_service = Arc::new(MetricsQueryService::new(storage.clone()));

    // 带合法 token 但日期参数非法
    let token = folio_backend::api::jwt::get_jwt_service()
        .generate_access_token("user-1", "admin@example.com")
        .expect("token");

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(recorder.clone()))
            .app_data(web::Data::new(query_service.clone()))
            .service(routes::metrics_routes()),
    )
    .await;

    let req = TestRequest::get()
        .uri("/metrics/unique-users/count?date=03%2F10%2F2026")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
