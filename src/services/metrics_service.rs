//! Metrics query service
//!
//! 只读投影，统一从 metrics 表读。bot / 真实用户的划分一律按
//! 落库时的类型标签过滤（不在查询时重跑分类器）：分类以写入当刻的
//! 模式表为准，历史分区不随模式表升级漂移。

use std::sync::Arc;

use chrono::NaiveDate;

use crate::analytics::{MetricType, local_day_bounds};
use crate::errors::Result;
use crate::storage::SeaOrmStorage;
use crate::storage::backend::MetricFilter;
use crate::storage::models::MetricRecord;

pub struct MetricsQueryService {
    storage: Arc<SeaOrmStorage>,
}

impl MetricsQueryService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn get_metrics(&self, metric_type: Option<MetricType>) -> Result<Vec<MetricRecord>> {
        self.storage
            .metrics_filtered(MetricFilter {
                metric_type: metric_type.map(|t| t.as_str()),
                ..MetricFilter::default()
            })
            .await
    }

    pub async fn get_metrics_by_path(
        &self,
        path: &str,
        metric_type: Option<MetricType>,
    ) -> Result<Vec<MetricRecord>> {
        self.storage
            .metrics_filtered(MetricFilter {
                metric_type: metric_type.map(|t| t.as_str()),
                path: Some(path),
                ..MetricFilter::default()
            })
            .await
    }

    pub async fn get_metrics_by_user(
        &self,
        user_id: &str,
        metric_type: Option<MetricType>,
    ) -> Result<Vec<MetricRecord>> {
        self.storage
            .metrics_filtered(MetricFilter {
                metric_type: metric_type.map(|t| t.as_str()),
                user_id: Some(user_id),
                ..MetricFilter::default()
            })
            .await
    }

    pub async fn get_metric_count(&self, metric_type: Option<MetricType>) -> Result<u64> {
        self.storage
            .count_metrics(metric_type.map(|t| t.as_str()))
            .await
    }

    // ============ bot / 真实用户分区 ============

    /// BOT 记录；额外给了类型且不是 BOT 时自然得到空集
    pub async fn get_bot_metrics(
        &self,
        metric_type: Option<MetricType>,
    ) -> Result<Vec<MetricRecord>> {
        let bots = self
            .storage
            .metrics_filtered(MetricFilter {
                metric_type: Some(MetricType::Bot.as_str()),
                ..MetricFilter::default()
            })
            .await?;

        match metric_type {
            None | Some(MetricType::Bot) => Ok(bots),
            Some(other) => Ok(bots
                .into_iter()
                .filter(|m| m.metric_type == other.as_str())
                .collect()),
        }
    }

    /// 真实用户记录：默认 VISIT，也可显式指定类型
    pub async fn get_real_user_metrics(
        &self,
        metric_type: Option<MetricType>,
    ) -> Result<Vec<MetricRecord>> {
        let effective = metric_type.unwrap_or(MetricType::Visit);
        self.storage
            .metrics_filtered(MetricFilter {
                metric_type: Some(effective.as_str()),
                ..MetricFilter::default()
            })
            .await
    }

    pub async fn get_bot_metrics_by_path(&self, path: &str) -> Result<Vec<MetricRecord>> {
        self.storage
            .metrics_filtered(MetricFilter {
                metric_type: Some(MetricType::Bot.as_str()),
                path: Some(path),
                ..MetricFilter::default()
            })
            .await
    }

    pub async fn get_real_user_metrics_by_path(
        &self,
        path: &str,
        metric_type: Option<MetricType>,
    ) -> Result<Vec<MetricRecord>> {
        let effective = metric_type.unwrap_or(MetricType::Visit);
        self.storage
            .metrics_filtered(MetricFilter {
                metric_type: Some(effective.as_str()),
                path: Some(path),
                ..MetricFilter::default()
            })
            .await
    }

    pub async fn get_bot_metric_count(&self) -> Result<u64> {
        self.storage
            .count_metrics(Some(MetricType::Bot.as_str()))
            .await
    }

    pub async fn get_real_user_metric_count(&self) -> Result<u64> {
        self.storage
            .count_metrics(Some(MetricType::Visit.as_str()))
            .await
    }

    pub async fn get_cv_visit_metric_count(&self) -> Result<u64> {
        self.storage
            .count_metrics(Some(MetricType::CvVisit.as_str()))
            .await
    }

    pub async fn get_cv_click_metric_count(&self) -> Result<u64> {
        self.storage
            .count_metrics(Some(MetricType::CvClick.as_str()))
            .await
    }

    // ============ 按日 distinct-IP 统计 ============

    pub async fn get_unique_users_per_day(&self, date: Option<NaiveDate>) -> Result<u64> {
        self.count_unique_ips(MetricType::Visit, date).await
    }

    pub async fn get_unique_bots_per_day(&self, date: Option<NaiveDate>) -> Result<u64> {
        self.count_unique_ips(MetricType::Bot, date).await
    }

    pub async fn get_unique_cv_clicks_per_day(&self, date: Option<NaiveDate>) -> Result<u64> {
        self.count_unique_ips(MetricType::CvClick, date).await
    }

    async fn count_unique_ips(
        &self,
        metric_type: MetricType,
        date: Option<NaiveDate>,
    ) -> Result<u64> {
        let (start, end) = local_day_bounds(date);
        self.storage
            .count_distinct_ips_in_window(metric_type.as_str(), start, end)
            .await
    }
}
