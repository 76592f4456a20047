//! HTTP API 服务模块
//!
//! 该模块包含全部端点，包括：
//! - 认证（登录、token 刷新、密码重置）
//! - 作品集内容 CRUD（hero、CV、项目、徽章）
//! - 留言提交与管理
//! - 指标上报与查询
//! - 文件上传与访问
//! - 健康检查

pub mod auth;
pub mod badges;
pub mod contact;
pub mod cv;
pub mod error_code;
pub mod health;
pub mod helpers;
pub mod heroes;
pub mod metrics;
pub mod projects;
pub mod routes;
pub mod types;
pub mod upload;

pub use error_code::ErrorCode;
pub use health::AppStartTime;
pub use helpers::{
    api_result, api_result_found, error_from_portfolio, error_response, parse_date_param,
    parse_metric_type, success_response,
};
pub use types::*;
