//! API 类型定义

use serde::{Deserialize, Serialize};

/// 统一响应信封
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokensResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetConfirm {
    pub token: String,
    pub new_password: String,
}

/// 计数响应
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CountResponse {
    pub count: u64,
}

// ============ 指标相关 ============

/// POST /metrics 请求体
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateMetricRequest {
    #[serde(rename = "type")]
    pub metric_type: String,
    pub path: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// POST /metrics/visit 请求体
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TrackVisitRequest {
    pub path: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// 指标查询参数：type 留作字符串，解析失败要报 400 而不是反序列化错误
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct MetricTypeQuery {
    #[serde(rename = "type")]
    pub metric_type: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MetricPathQuery {
    pub path: String,
    #[serde(rename = "type")]
    pub metric_type: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MetricUserQuery {
    pub user_id: String,
    #[serde(rename = "type")]
    pub metric_type: Option<String>,
}

/// `date` 接受 ISO 日期（YYYY-MM-DD 或 RFC3339 前缀）
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct DateQuery {
    pub date: Option<String>,
}

/// POST /metrics/cv-click 请求体
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CvClickRequest {
    #[serde(default)]
    pub cv_id: Option<String>,
}

// ============ 上传相关 ============

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFileResponse {
    pub originalname: String,
    pub filename: String,
    pub path: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CvFileInfoResponse {
    pub filename: String,
    pub file_url: String,
    pub file_type: String,
    pub file_size: u64,
    pub last_modified: Option<chrono::DateTime<chrono::Utc>>,
    pub mimetype: String,
}

// ============ 健康检查 ============

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthStorageCheck {
    pub status: String,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u32,
    pub storage: HealthStorageCheck,
}
