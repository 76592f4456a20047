//! Metric persistence for SeaOrmStorage
//!
//! 写入端实现 `MetricStore`（Recorder 的去重探测 + 插入），
//! 读取端提供查询服务用到的过滤、计数和 distinct-IP 统计。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use tracing::debug;

use super::{SeaOrmStorage, retry};
use crate::analytics::MetricStore;
use crate::errors::Result;
use crate::storage::models::MetricRecord;

use migration::entities::metric;

#[async_trait]
impl MetricStore for SeaOrmStorage {
    async fn insert_metric(&self, record: MetricRecord) -> anyhow::Result<MetricRecord> {
        let model = metric::ActiveModel {
            id: Set(record.id.clone()),
            metric_type: Set(record.metric_type.clone()),
            path: Set(record.path.clone()),
            user_id: Set(record.user_id.clone()),
            user_agent: Set(record.user_agent.clone()),
            ip_address: Set(record.ip_address.clone()),
            metadata: Set(record.metadata.clone()),
            created_at: Set(record.created_at),
            updated_at: Set(record.updated_at),
        };

        let db = &self.db;
        let inserted = retry::with_retry("insert_metric", self.retry_config, || {
            let model = model.clone();
            async move { model.insert(db).await }
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to insert metric: {}", e))?;

        debug!(
            "Metric {} recorded for path {} ({})",
            inserted.metric_type, inserted.path, inserted.id
        );
        Ok(MetricRecord::from(inserted))
    }

    async fn find_metric_in_window(
        &self,
        metric_type: &str,
        ip_address: &str,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> anyhow::Result<Option<MetricRecord>> {
        let db = &self.db;
        let found = retry::with_retry("find_metric_in_window", self.retry_config, || async {
            metric::Entity::find()
                .filter(metric::Column::MetricType.eq(metric_type))
                .filter(metric::Column::IpAddress.eq(ip_address))
                .filter(metric::Column::CreatedAt.gte(day_start))
                .filter(metric::Column::CreatedAt.lt(day_end))
                .order_by_asc(metric::Column::CreatedAt)
                .one(db)
                .await
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to probe metric window: {}", e))?;

        Ok(found.map(MetricRecord::from))
    }
}

/// 查询端过滤条件
#[derive(Default, Clone, Debug)]
pub struct MetricFilter<'a> {
    pub metric_type: Option<&'a str>,
    pub path: Option<&'a str>,
    pub user_id: Option<&'a str>,
}

impl SeaOrmStorage {
    /// 按条件查询指标，最新的在前
    pub async fn metrics_filtered(&self, filter: MetricFilter<'_>) -> Result<Vec<MetricRecord>> {
        let mut query = metric::Entity::find();

        if let Some(metric_type) = filter.metric_type {
            query = query.filter(metric::Column::MetricType.eq(metric_type));
        }
        if let Some(path) = filter.path {
            query = query.filter(metric::Column::Path.eq(path));
        }
        if let Some(user_id) = filter.user_id {
            query = query.filter(metric::Column::UserId.eq(user_id));
        }

        let models = query
            .order_by_desc(metric::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(MetricRecord::from).collect())
    }

    /// 指标计数
    pub async fn count_metrics(&self, metric_type: Option<&str>) -> Result<u64> {
        let mut query = metric::Entity::find();
        if let Some(metric_type) = metric_type {
            query = query.filter(metric::Column::MetricType.eq(metric_type));
        }
        Ok(query.count(&self.db).await?)
    }

    /// 时间窗口内某类型的 distinct 非空 IP 数
    pub async fn count_distinct_ips_in_window(
        &self,
        metric_type: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64> {
        let ips: Vec<Option<String>> = metric::Entity::find()
            .select_only()
            .column(metric::Column::IpAddress)
            .distinct()
            .filter(metric::Column::MetricType.eq(metric_type))
            .filter(metric::Column::IpAddress.is_not_null())
            .filter(metric::Column::CreatedAt.gte(start))
            .filter(metric::Column::CreatedAt.lt(end))
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(ips.into_iter().flatten().count() as u64)
    }
}
