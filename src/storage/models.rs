//! 领域模型
//!
//! 存储实体到 API 载荷的统一形态。序列化为 camelCase，
//! 与前端约定保持一致。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use migration::entities::{badge, contact, cv, hero, metric, project, project_category, user};

/// 一次流量观测记录
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub metric_type: String,
    pub path: String,
    pub user_id: Option<String>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<metric::Model> for MetricRecord {
    fn from(model: metric::Model) -> Self {
        Self {
            id: model.id,
            metric_type: model.metric_type,
            path: model.path,
            user_id: model.user_id,
            user_agent: model.user_agent,
            ip_address: model.ip_address,
            metadata: model.metadata,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// 管理员账号（对外载荷，不含密码哈希）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<user::Model> for User {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            role: model.role,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub job_title: String,
    pub job_description: String,
    pub cv_path: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<hero::Model> for Hero {
    fn from(model: hero::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            job_title: model.job_title,
            job_description: model.job_description,
            cv_path: model.cv_path,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cv {
    pub id: String,
    pub file_path: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<cv::Model> for Cv {
    fn from(model: cv::Model) -> Self {
        Self {
            id: model.id,
            file_path: model.file_path,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCategory {
    pub id: String,
    pub label: String,
    pub icon: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<project_category::Model> for ProjectCategory {
    fn from(model: project_category::Model) -> Self {
        Self {
            id: model.id,
            label: model.label,
            icon: model.icon,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub category_id: String,
    pub deploy_url: Option<String>,
    pub icon_deploy: String,
    pub technologies: Vec<String>,
    pub priority: i32,
    pub repos: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ProjectCategory>,
}

impl Project {
    pub fn from_model(model: project::Model, category: Option<project_category::Model>) -> Self {
        let technologies = serde_json::from_value(model.technologies).unwrap_or_default();
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            image: model.image,
            category_id: model.category_id,
            deploy_url: model.deploy_url,
            icon_deploy: model.icon_deploy,
            technologies,
            priority: model.priority,
            repos: model.repos,
            created_at: model.created_at,
            updated_at: model.updated_at,
            category: category.map(ProjectCategory::from),
        }
    }
}

/// 徽章状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BadgeStatus {
    Available,
    Unavailable,
    AvailableFrom,
}

impl BadgeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeStatus::Available => "AVAILABLE",
            BadgeStatus::Unavailable => "UNAVAILABLE",
            BadgeStatus::AvailableFrom => "AVAILABLE_FROM",
        }
    }

    /// 按状态和起始时间推导当前可用性
    pub fn resolve_availability(&self, available_from: Option<DateTime<Utc>>) -> bool {
        match self {
            BadgeStatus::Available => true,
            BadgeStatus::Unavailable => false,
            BadgeStatus::AvailableFrom => {
                available_from.is_some_and(|from| from <= Utc::now())
            }
        }
    }
}

impl std::fmt::Display for BadgeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BadgeStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(Self::Available),
            "UNAVAILABLE" => Ok(Self::Unavailable),
            "AVAILABLE_FROM" => Ok(Self::AvailableFrom),
            _ => Err(format!("Unknown badge status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub status: String,
    pub available_from: Option<DateTime<Utc>>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<badge::Model> for Badge {
    fn from(model: badge::Model) -> Self {
        Self {
            id: model.id,
            status: model.status,
            available_from: model.available_from,
            is_available: model.is_available,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<contact::Model> for Contact {
    fn from(model: contact::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            subject: model.subject,
            message: model.message,
            is_read: model.is_read,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

// ============ 写入侧载荷 ============

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroInput {
    pub first_name: String,
    pub last_name: String,
    pub job_title: String,
    pub job_description: String,
    #[serde(default)]
    pub cv_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub job_title: Option<String>,
    pub job_description: Option<String>,
    pub cv_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvInput {
    #[serde(default)]
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    pub category_id: String,
    #[serde(default)]
    pub deploy_url: Option<String>,
    pub icon_deploy: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub repos: serde_json::Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category_id: Option<String>,
    pub deploy_url: Option<String>,
    pub icon_deploy: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub priority: Option<i32>,
    pub repos: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub label: String,
    pub icon: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    pub label: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeInput {
    pub status: BadgeStatus,
    #[serde(default)]
    pub available_from: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgePatch {
    pub status: Option<BadgeStatus>,
    pub available_from: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInput {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_badge_status_round_trip() {
        for (variant, tag) in [
            (BadgeStatus::Available, "AVAILABLE"),
            (BadgeStatus::Unavailable, "UNAVAILABLE"),
            (BadgeStatus::AvailableFrom, "AVAILABLE_FROM"),
        ] {
            assert_eq!(variant.as_str(), tag);
            assert_eq!(BadgeStatus::from_str(tag).unwrap(), variant);
        }
        assert!(BadgeStatus::from_str("BUSY").is_err());
    }

    #[test]
    fn test_badge_availability_resolution() {
        assert!(BadgeStatus::Available.resolve_availability(None));
        assert!(!BadgeStatus::Unavailable.resolve_availability(None));

        let past = Utc::now() - chrono::Duration::hours(1);
        let future = Utc::now() + chrono::Duration::hours(1);
        assert!(BadgeStatus::AvailableFrom.resolve_availability(Some(past)));
        assert!(!BadgeStatus::AvailableFrom.resolve_availability(Some(future)));
        assert!(!BadgeStatus::AvailableFrom.resolve_availability(None));
    }

    #[test]
    fn test_metric_record_wire_format() {
        let record = MetricRecord {
            id: "abc".to_string(),
            metric_type: "VISIT".to_string(),
            path: "/".to_string(),
            user_id: None,
            user_agent: Some("curl/8".to_string()),
            ip_address: Some("203.0.113.1".to_string()),
            metadata: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "VISIT");
        assert_eq!(json["userAgent"], "curl/8");
        assert_eq!(json["ipAddress"], "203.0.113.1");
        assert!(json.get("metric_type").is_none());
    }
}
