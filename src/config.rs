//! 应用配置
//!
//! 从 `config.toml` 与环境变量加载（优先级：ENV > config.toml > 默认值）。
//! ENV 前缀：PF，分隔符：__，示例：`PF__SERVER__PORT=9999`。

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// 初始化全局配置（进程启动时调用一次）
pub fn init_config() -> &'static AppConfig {
    CONFIG.get_or_init(AppConfig::load)
}

/// 获取全局配置
///
/// 未显式初始化时按需加载，保证测试环境也能拿到默认配置。
pub fn get_config() -> &'static AppConfig {
    CONFIG.get_or_init(AppConfig::load)
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub uploads: UploadsConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl AppConfig {
    /// 从 TOML 文件和环境变量加载配置
    pub fn load() -> Self {
        use config::{Config, Environment, File};

        let path = "config.toml";

        let builder = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::with_name(path).required(false))
            // 2. 从环境变量覆盖，前缀 PF，分隔符 __
            .add_source(
                Environment::with_prefix("PF")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<AppConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

/// API / 认证配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// JWT 签名密钥；为空则启动时生成随机值（重启后旧 token 失效）
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_access_token_minutes")]
    pub access_token_minutes: u64,
    #[serde(default = "default_refresh_token_days")]
    pub refresh_token_days: u64,
    /// 管理员初始账号，users 表为空时在启动阶段写入
    #[serde(default = "default_admin_email")]
    pub admin_email: String,
    #[serde(default)]
    pub admin_password: String,
    /// CORS 允许的前端来源
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    /// 密码重置 token 有效期（分钟）
    #[serde(default = "default_reset_token_minutes")]
    pub reset_token_minutes: u64,
    /// 前端地址，用于拼接密码重置链接
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
}

/// SMTP 邮件配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// 为空时邮件发送整体停用（本地开发默认）
    #[serde(default)]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_username: String,
    #[serde(default)]
    pub smtp_password: String,
    #[serde(default = "default_smtp_starttls")]
    pub starttls: bool,
    #[serde(default = "default_mail_from_name")]
    pub from_name: String,
    #[serde(default)]
    pub from_address: String,
    /// 留言通知的收件地址（站长邮箱）
    #[serde(default)]
    pub admin_address: String,
}

impl MailConfig {
    pub fn enabled(&self) -> bool {
        !self.smtp_host.is_empty() && !self.from_address.is_empty()
    }
}

/// 上传配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadsConfig {
    #[serde(default = "default_uploads_dir")]
    pub dir: String,
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: usize,
}

/// 指标采集配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// 中间件内等待指标落库的上限；超时只记日志，请求照常继续
    #[serde(default = "default_metrics_write_timeout_ms")]
    pub write_timeout_ms: u64,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    3000
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_database_url() -> String {
    "sqlite://portfolio.db".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_access_token_minutes() -> u64 {
    15
}

fn default_refresh_token_days() -> u64 {
    7
}

fn default_admin_email() -> String {
    "admin@localhost".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:4200".to_string()]
}

fn default_reset_token_minutes() -> u64 {
    30
}

fn default_frontend_url() -> String {
    "http://localhost:4200".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_smtp_starttls() -> bool {
    true
}

fn default_mail_from_name() -> String {
    "Portfolio".to_string()
}

fn default_uploads_dir() -> String {
    "uploads".to_string()
}

fn default_max_file_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_metrics_write_timeout_ms() -> u64 {
    2000
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            retry_count: default_retry_count(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            access_token_minutes: default_access_token_minutes(),
            refresh_token_days: default_refresh_token_days(),
            admin_email: default_admin_email(),
            admin_password: String::new(),
            allowed_origins: default_allowed_origins(),
            reset_token_minutes: default_reset_token_minutes(),
            frontend_url: default_frontend_url(),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            starttls: default_smtp_starttls(),
            from_name: default_mail_from_name(),
            from_address: String::new(),
            admin_address: String::new(),
        }
    }
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            dir: default_uploads_dir(),
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            write_timeout_ms: default_metrics_write_timeout_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.database_url, "sqlite://portfolio.db");
        assert_eq!(config.api.access_token_minutes, 15);
        assert_eq!(config.metrics.write_timeout_ms, 2000);
        assert_eq!(config.uploads.max_file_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn test_mail_disabled_by_default() {
        let config = MailConfig::default();
        assert!(!config.enabled());

        let configured = MailConfig {
            smtp_host: "smtp.example.com".to_string(),
            from_address: "noreply@example.com".to_string(),
            ..MailConfig::default()
        };
        assert!(configured.enabled());
    }
}
