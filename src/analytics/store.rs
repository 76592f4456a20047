//! 指标持久化接口
//!
//! Recorder 通过这个 trait 写库，存储实现挂在 `storage::backend`；
//! 测试里可以注入失败或内存实现。

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::storage::models::MetricRecord;

#[async_trait]
pub trait MetricStore: Send + Sync {
    /// 插入一条指标记录
    async fn insert_metric(&self, record: MetricRecord) -> anyhow::Result<MetricRecord>;

    /// 查找同类型、同 IP 且 `created_at` 落在 `[day_start, day_end)` 内的记录
    ///
    /// 去重探测专用；返回最早一条即可。
    async fn find_metric_in_window(
        &self,
        metric_type: &str,
        ip_address: &str,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> anyhow::Result<Option<MetricRecord>>;
}
