//! 健康检查端点

use std::sync::Arc;
use std::time::Duration;

use actix_web::{Responder, Result as ActixResult, web};
use tracing::{error, trace};

use crate::storage::SeaOrmStorage;

use super::helpers::success_response;
use super::types::{HealthResponse, HealthStorageCheck};

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// GET /health
///
/// 只查一次指标计数作为存储探针，不加载任何表数据。
pub async fn health_check(
    storage: web::Data<Arc<SeaOrmStorage>>,
    app_start_time: web::Data<AppStartTime>,
) -> ActixResult<impl Responder> {
    trace!("Received health check request");

    let backend = storage.backend_name().to_string();
    let storage_check =
        match tokio::time::timeout(Duration::from_secs(5), storage.count_metrics(None)).await {
            Ok(Ok(_)) => HealthStorageCheck {
                status: "healthy".to_string(),
                backend,
                error: None,
            },
            Ok(Err(e)) => {
                error!("Storage health check failed: {}", e);
                HealthStorageCheck {
                    status: "unhealthy".to_string(),
                    backend,
                    error: Some(format!("database error: {}", e)),
                }
            }
            Err(_) => {
                error!("Storage health check timeout");
                HealthStorageCheck {
                    status: "unhealthy".to_string(),
                    backend,
                    error: Some("timeout".to_string()),
                }
            }
        };

    let now = chrono::Utc::now();
    let uptime = (now - app_start_time.start_datetime).num_seconds().max(0) as u32;
    let status = if storage_check.status == "healthy" {
        "healthy"
    } else {
        "unhealthy"
    };

    Ok(success_response(HealthResponse {
        status: status.to_string(),
        timestamp: now.to_rfc3339(),
        uptime,
        storage: storage_check,
    }))
}
