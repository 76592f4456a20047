//! API 模块常量定义

/// 指标上报/查询路由前缀（中间件按它跳过自身流量）
pub const METRICS_ROUTE_PREFIX: &str = "/metrics";

/// 上传文件访问前缀（静态资源，不计入访问统计）
pub const UPLOADS_ROUTE_PREFIX: &str = "/uploads/";

/// CV 规范化路径：/cv 与 /cv/* 都归并到这里
pub const CV_CANONICAL_PATH: &str = "/cv";
