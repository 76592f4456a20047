//! 流量指标采集
//!
//! - `bot_detector`: UserAgent 子串匹配的爬虫识别（纯函数）
//! - `recorder`: 指标写入编排（按 IP/类型/自然日去重）
//! - `store`: 写入端的持久化接口

pub mod bot_detector;
pub mod recorder;
pub mod store;

pub use recorder::MetricsRecorder;
pub use store::MetricStore;

use chrono::{DateTime, Days, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::models::MetricRecord;

/// 指标类型标签
///
/// 存储层按字符串保存，集合保持开放：库里出现未知标签不影响已有代码读取。
/// 这里只枚举当前会写入的类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricType {
    Visit,
    Bot,
    CvVisit,
    CvClick,
    ContactFormSubmitted,
    EmailSent,
}

impl MetricType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Visit => "VISIT",
            MetricType::Bot => "BOT",
            MetricType::CvVisit => "CV_VISIT",
            MetricType::CvClick => "CV_CLICK",
            MetricType::ContactFormSubmitted => "CONTACT_FORM_SUBMITTED",
            MetricType::EmailSent => "EMAIL_SENT",
        }
    }
}

impl std::fmt::Display for MetricType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MetricType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VISIT" => Ok(Self::Visit),
            "BOT" => Ok(Self::Bot),
            "CV_VISIT" => Ok(Self::CvVisit),
            "CV_CLICK" => Ok(Self::CvClick),
            "CONTACT_FORM_SUBMITTED" => Ok(Self::ContactFormSubmitted),
            "EMAIL_SENT" => Ok(Self::EmailSent),
            _ => Err(format!("Unknown metric type: {}", s)),
        }
    }
}

/// 一次待写入的指标观测
#[derive(Debug, Clone)]
pub struct NewMetric {
    pub metric_type: MetricType,
    pub path: String,
    pub user_id: Option<String>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl NewMetric {
    pub fn new(metric_type: MetricType, path: impl Into<String>) -> Self {
        Self {
            metric_type,
            path: path.into(),
            user_id: None,
            user_agent: None,
            ip_address: None,
            metadata: None,
        }
    }
}

/// `track_visit` 的结果：成功的记录，或被吞掉的失败
///
/// 访问埋点永远不让错误冒泡给调用方，失败时序列化为
/// `{"skipped": true, "reason": "..."}`。
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TrackOutcome {
    Recorded(MetricRecord),
    Skipped { skipped: bool, reason: String },
}

impl TrackOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        TrackOutcome::Skipped {
            skipped: true,
            reason: reason.into(),
        }
    }
}

/// 服务器本地时区下，某自然日的 UTC 起止时刻 `[00:00, 次日 00:00)`
///
/// 去重窗口和按日统计都用这个边界；存储本身始终是 UTC。
pub fn local_day_bounds(date: Option<NaiveDate>) -> (DateTime<Utc>, DateTime<Utc>) {
    let day = date.unwrap_or_else(|| Local::now().date_naive());
    let next = day
        .checked_add_days(Days::new(1))
        .unwrap_or(day);
    (local_midnight_utc(day), local_midnight_utc(next))
}

/// 本地午夜换算为 UTC 时刻；DST 间隙/重叠取最早的解释
fn local_midnight_utc(day: NaiveDate) -> DateTime<Utc> {
    let naive = day.and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_metric_type_round_trip() {
        for (variant, tag) in [
            (MetricType::Visit, "VISIT"),
            (MetricType::Bot, "BOT"),
            (MetricType::CvVisit, "CV_VISIT"),
            (MetricType::CvClick, "CV_CLICK"),
            (MetricType::ContactFormSubmitted, "CONTACT_FORM_SUBMITTED"),
            (MetricType::EmailSent, "EMAIL_SENT"),
        ] {
            assert_eq!(variant.as_str(), tag);
            assert_eq!(MetricType::from_str(tag).unwrap(), variant);
        }
    }

    #[test]
    fn test_metric_type_rejects_unknown() {
        assert!(MetricType::from_str("PAGEVIEW").is_err());
        assert!(MetricType::from_str("visit").is_err());
    }

    #[test]
    fn test_local_day_bounds_span_one_day() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let (start, end) = local_day_bounds(Some(day));
        assert_eq!(end - start, chrono::Duration::days(1));
    }

    #[test]
    fn test_local_day_bounds_contain_now() {
        let (start, end) = local_day_bounds(None);
        let now = Utc::now();
        assert!(start <= now && now < end);
    }

    #[test]
    fn test_track_outcome_skipped_serialization() {
        let outcome = TrackOutcome::skipped("Error tracking visit");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["skipped"], true);
        assert_eq!(json["reason"], "Error tracking visit");
    }
}
