//! Metrics pipeline tests
//!
//! Recorder 去重、按日 distinct-IP 统计和查询服务分区，
//! 跑在临时 SQLite 数据库上。

use chrono::{Duration, Utc};
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

use folio_backend::analytics::{MetricStore, MetricType, MetricsRecorder, NewMetric};
use folio_backend::services::MetricsQueryService;
use folio_backend::storage::SeaOrmStorage;
use folio_backend::storage::models::MetricRecord;

/// 创建临时 SQLite 数据库的存储实例
async fn create_temp_storage() -> (Arc<SeaOrmStorage>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = SeaOrmStorage::new(&db_url, "sqlite")
        .await
        .expect("Failed to create storage");

    (Arc::new(storage), temp_dir)
}

fn recorder_for(storage: &Arc<SeaOrmStorage>) -> MetricsRecorder {
    let store: Arc<dyn MetricStore> = storage.clone();
    MetricsRecorder::new(store)
}

fn visit_metric(ip: &str) -> NewMetric {
    let mut metric = NewMetric::new(MetricType::Visit, "/");
    metric.ip_address = Some(ip.to_string());
    metric
}

/// 手工构造一条记录（绕过去重，用于铺测试数据）
fn raw_record(
    metric_type: &str,
    ip: Option<&str>,
    created_at: chrono::DateTime<Utc>,
) -> MetricRecord {
    MetricRecord {
        id: Uuid::new_v4().to_string(),
        metric_type: metric_type.to_string(),
        path: "/".to_string(),
        user_id: None,
        user_agent: None,
        ip_address: ip.map(String::from),
        metadata: None,
        created_at,
        updated_at: created_at,
    }
}

#[tokio::test]
async fn test_same_day_dedup_returns_existing_record() {
    let (storage, _dir) = create_temp_storage().await;
    let recorder = recorder_for(&storage);

    let first = recorder
        .create_metric(visit_metric("203.0.113.9"))
        .await
        .expect("first insert");
    let second = recorder
        .create_metric(visit_metric("203.0.113.9"))
        .await
        .expect("second insert");

    assert_eq!(first.id, second.id);
    assert_eq!(storage.count_metrics(None).await.unwrap(), 1);
}

#[tokio::test]
async fn test_yesterday_record_does_not_dedup_today() {
    let (storage, _dir) = create_temp_storage().await;
    let recorder = recorder_for(&storage);

    // 昨天已有同 IP 同类型的记录
    let yesterday = Utc::now() - Duration::days(1);
    storage
        .insert_metric(raw_record("VISIT", Some("203.0.113.9"), yesterday))
        .await
        .expect("seed insert");

    let today = recorder
        .create_metric(visit_metric("203.0.113.9"))
        .await
        .expect("today insert");

    assert_eq!(storage.count_metrics(None).await.unwrap(), 2);
    assert!(today.created_at > yesterday);
}

#[tokio::test]
async fn test_dedup_is_scoped_by_type() {
    let (storage, _dir) = create_temp_storage().await;
    let recorder = recorder_for(&storage);

    recorder
        .create_metric(visit_metric("203.0.113.9"))
        .await
        .expect("visit insert");

    let mut click = NewMetric::new(MetricType::CvClick, "/cv");
    click.ip_address = Some("203.0.113.9".to_string());
    recorder.create_metric(click).await.expect("click insert");

    assert_eq!(storage.count_metrics(None).await.unwrap(), 2);
}

#[tokio::test]
async fn test_missing_ip_always_inserts() {
    let (storage, _dir) = create_temp_storage().await;
    let recorder = recorder_for(&storage);

    let first = recorder
        .create_metric(NewMetric::new(MetricType::EmailSent, "/contact"))
        .await
        .expect("first insert");
    let second = recorder
        .create_metric(NewMetric::new(MetricType::EmailSent, "/contact"))
        .await
        .expect("second insert");

    assert_ne!(first.id, second.id);
    assert_eq!(storage.count_metrics(None).await.unwrap(), 2);
}

#[tokio::test]
async fn test_unique_users_per_day_counts_distinct_ips() {
    let (storage, _dir) = create_temp_storage().await;
    let query_service = MetricsQueryService::new(storage.clone());

    let now = Utc::now();
    // 一个 IP 三条，另一个 IP 两条
    for _ in 0..3 {
        storage
            .insert_metric(raw_record("VISIT", Some("203.0.113.1"), now))
            .await
            .expect("insert");
    }
    for _ in 0..2 {
        storage
            .insert_metric(raw_record("VISIT", Some("203.0.113.2"), now))
            .await
            .expect("insert");
    }
    // 无 IP 的记录不计入
    storage
        .insert_metric(raw_record("VISIT", None, now))
        .await
        .expect("insert");

    let count = query_service
        .get_unique_users_per_day(None)
        .await
        .expect("query");
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_unique_counts_are_type_scoped() {
    let (storage, _dir) = create_temp_storage().await;
    let query_service = MetricsQueryService::new(storage.clone());

    let now = Utc::now();
    storage
        .insert_metric(raw_record("VISIT", Some("203.0.113.1"), now))
        .await
        .expect("insert");
    storage
        .insert_metric(raw_record("BOT", Some("203.0.113.2"), now))
        .await
        .expect("insert");
    storage
        .insert_metric(raw_record("CV_CLICK", Some("203.0.113.3"), now))
        .await
        .expect("insert");

    assert_eq!(
        query_service.get_unique_users_per_day(None).await.unwrap(),
        1
    );
    assert_eq!(
        query_service.get_unique_bots_per_day(None).await.unwrap(),
        1
    );
    assert_eq!(
        query_service
            .get_unique_cv_clicks_per_day(None)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_unique_count_for_other_day_is_zero() {
    let (storage, _dir) = create_temp_storage().await;
    let query_service = MetricsQueryService::new(storage.clone());

    storage
        .insert_metric(raw_record("VISIT", Some("203.0.113.1"), Utc::now()))
        .await
        .expect("insert");

    let last_month = (Utc::now() - Duration::days(30)).date_naive();
    assert_eq!(
        query_service
            .get_unique_users_per_day(Some(last_month))
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn test_metrics_ordered_newest_first() {
    let (storage, _dir) = create_temp_storage().await;
    let query_service = MetricsQueryService::new(storage.clone());

    let older = Utc::now() - Duration::hours(2);
    let newer = Utc::now();
    let old_record = storage
        .insert_metric(raw_record("VISIT", Some("203.0.113.1"), older))
        .await
        .expect("insert");
    let new_record = storage
        .insert_metric(raw_record("VISIT", Some("203.0.113.2"), newer))
        .await
        .expect("insert");

    let metrics = query_service.get_metrics(None).await.expect("query");
    assert_eq!(metrics.len(), 2);
    assert_eq!(metrics[0].id, new_record.id);
    assert_eq!(metrics[1].id, old_record.id);
}

#[tokio::test]
async fn test_bot_and_real_user_partition_by_stored_type() {
    let (storage, _dir) = create_temp_storage().await;
    let query_service = MetricsQueryService::new(storage.clone());

    let now = Utc::now();
    storage
        .insert_metric(raw_record("BOT", Some("203.0.113.1"), now))
        .await
        .expect("insert");
    storage
        .insert_metric(raw_record("VISIT", Some("203.0.113.2"), now))
        .await
        .expect("insert");
    storage
        .insert_metric(raw_record("CV_VISIT", Some("203.0.113.3"), now))
        .await
        .expect("insert");

    let bots = query_service.get_bot_metrics(None).await.expect("bots");
    assert_eq!(bots.len(), 1);
    assert_eq!(bots[0].metric_type, "BOT");

    let users = query_service
        .get_real_user_metrics(None)
        .await
        .expect("users");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].metric_type, "VISIT");

    // CV_VISIT 两边都不算，但能按类型显式查到
    let cv_visits = query_service
        .get_metrics(Some(MetricType::CvVisit))
        .await
        .expect("cv visits");
    assert_eq!(cv_visits.len(), 1);

    assert_eq!(query_service.get_bot_metric_count().await.unwrap(), 1);
    assert_eq!(query_service.get_real_user_metric_count().await.unwrap(), 1);
    assert_eq!(query_service.get_cv_visit_metric_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_metrics_by_path_and_user() {
    let (storage, _dir) = create_temp_storage().await;
    let query_service = MetricsQueryService::new(storage.clone());

    let mut record = raw_record("VISIT", Some("203.0.113.1"), Utc::now());
    record.path = "/projects".to_string();
    record.user_id = Some("user-1".to_string());
    storage.insert_metric(record).await.expect("insert");

    let mut other = raw_record("VISIT", Some("203.0.113.2"), Utc::now());
    other.path = "/about".to_string();
    storage.insert_metric(other).await.expect("insert");

    let by_path = query_service
        .get_metrics_by_path("/projects", None)
        .await
        .expect("by path");
    assert_eq!(by_path.len(), 1);
    assert_eq!(by_path[0].path, "/projects");

    let by_user = query_service
        .get_metrics_by_user("user-1", None)
        .await
        .expect("by user");
    assert_eq!(by_user.len(), 1);
    assert_eq!(by_user[0].user_id.as_deref(), Some("user-1"));
}
