//! 指标写入编排
//!
//! 唯一的写入口。写之前按 (类型, IP, 服务器本地自然日) 做一次去重探测，
//! 命中则直接返回已有记录，不命中才插入。探测与插入之间没有锁，
//! 并发下可能重复写入（接受最终去重，读侧按 distinct IP 统计）。

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::{PortfolioError, Result};
use crate::storage::models::MetricRecord;

use super::store::MetricStore;
use super::{NewMetric, TrackOutcome, local_day_bounds};

pub struct MetricsRecorder {
    store: Arc<dyn MetricStore>,
}

impl MetricsRecorder {
    pub fn new(store: Arc<dyn MetricStore>) -> Self {
        Self { store }
    }

    /// 写入一条指标
    ///
    /// 带 IP 时先探测当天是否已有同类型记录，有则幂等返回旧记录。
    /// 无 IP 的观测（如服务端内部事件）不去重，直接插入。
    pub async fn create_metric(&self, new: NewMetric) -> Result<MetricRecord> {
        let metric_type = new.metric_type.as_str();

        if let Some(ip) = new.ip_address.as_deref().filter(|ip| !ip.is_empty()) {
            let (day_start, day_end) = local_day_bounds(None);
            let existing = self
                .store
                .find_metric_in_window(metric_type, ip, day_start, day_end)
                .await
                .map_err(|e| PortfolioError::database_operation(e.to_string()))?;

            if let Some(record) = existing {
                debug!(
                    "Duplicate {} metric skipped for IP {} (existing id {})",
                    metric_type, ip, record.id
                );
                return Ok(record);
            }
        }

        let now = Utc::now();
        let record = MetricRecord {
            id: Uuid::new_v4().to_string(),
            metric_type: metric_type.to_string(),
            path: new.path,
            user_id: new.user_id,
            user_agent: new.user_agent,
            ip_address: new.ip_address.filter(|ip| !ip.is_empty()),
            metadata: new.metadata,
            created_at: now,
            updated_at: now,
        };

        self.store
            .insert_metric(record)
            .await
            .map_err(|e| PortfolioError::database_operation(e.to_string()))
    }

    /// 访问埋点便捷入口：固定 VISIT 类型，任何失败都不冒泡
    pub async fn track_visit(
        &self,
        path: impl Into<String>,
        user_id: Option<String>,
        user_agent: Option<String>,
        ip_address: Option<String>,
        metadata: Option<serde_json::Value>,
    ) -> TrackOutcome {
        let metric = NewMetric {
            metric_type: super::MetricType::Visit,
            path: path.into(),
            user_id,
            user_agent,
            ip_address,
            metadata,
        };

        match self.create_metric(metric).await {
            Ok(record) => TrackOutcome::Recorded(record),
            Err(e) => {
                warn!("Error in track_visit: {}", e);
                TrackOutcome::skipped("Error tracking visit")
            }
        }
    }
}
