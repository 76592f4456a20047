//! 流量指标中间件
//!
//! 每个进站请求走一遍：跳过静态资源类路径，提取 UA / IP / 可选身份，
//! 跑爬虫分类，归一化 CV 路径，然后同步等待指标落库（带上限超时）。
//! 任何失败只记日志，绝不影响被观测的请求本身。

use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use actix_service::{Service, Transform};
use actix_web::{
    Error, web,
    dev::{ServiceRequest, ServiceResponse},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use serde_json::json;
use tracing::{debug, error};

use crate::analytics::{MetricType, MetricsRecorder, NewMetric, bot_detector};
use crate::api::constants::{CV_CANONICAL_PATH, METRICS_ROUTE_PREFIX, UPLOADS_ROUTE_PREFIX};
use crate::api::middleware::auth::extract_optional_identity;
use crate::utils::ip::extract_forwarded_ip_from_headers;

/// 该路径是否不做埋点
///
/// 带扩展名的资源请求（含 `.`）、favicon、指标自身的路由、
/// 上传文件访问都会污染访问计数，直接放行。
pub fn should_skip_path(path: &str) -> bool {
    path.contains('.')
        || path.starts_with("/favicon.ico")
        || path.starts_with(METRICS_ROUTE_PREFIX)
        || path.starts_with(UPLOADS_ROUTE_PREFIX)
}

/// 从请求信号装配一条指标
///
/// 类型优先级：CV 路径 > 爬虫 > 普通访问。CV 子路径归并到 `/cv`，
/// 原始路径保留在 metadata 里。
pub fn build_request_metric(
    path: &str,
    user_agent: Option<String>,
    ip_address: Option<String>,
    user_id: Option<String>,
) -> NewMetric {
    let is_bot = bot_detector::is_bot(user_agent.as_deref());
    let bot_type = if is_bot {
        bot_detector::identify_bot_type(user_agent.as_deref())
    } else {
        None
    };

    let is_cv_visit = path == CV_CANONICAL_PATH
        || path.starts_with(&format!("{}/", CV_CANONICAL_PATH));

    let metric_type = if is_cv_visit {
        MetricType::CvVisit
    } else if is_bot {
        MetricType::Bot
    } else {
        MetricType::Visit
    };

    let mut metadata = json!({
        "isBot": is_bot,
        "userAgent": user_agent,
        "ipAddress": ip_address,
    });
    if let Some(bot_type) = bot_type {
        metadata["botType"] = json!(bot_type);
    }
    if is_cv_visit {
        metadata["originalPath"] = json!(path);
        metadata["cvAccess"] = json!(true);
    }

    NewMetric {
        metric_type,
        path: if is_cv_visit {
            CV_CANONICAL_PATH.to_string()
        } else {
            path.to_string()
        },
        user_id,
        user_agent,
        ip_address,
        metadata: Some(metadata),
    }
}

/// Traffic metrics middleware
#[derive(Clone)]
pub struct TrafficMetrics;

impl<S, B> Transform<S, ServiceRequest> for TrafficMetrics
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TrafficMetricsMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TrafficMetricsMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct TrafficMetricsMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for TrafficMetricsMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        Box::pin(async move {
            let path = req.path().to_string();

            if should_skip_path(&path) {
                return srv.call(req).await;
            }

            let user_agent = req
                .headers()
                .get("user-agent")
                .and_then(|h| h.to_str().ok())
                .map(String::from);
            let ip_address = extract_forwarded_ip_from_headers(req.headers())
                .or_else(|| req.peer_addr().map(|addr| addr.ip().to_string()));
            let user_id = extract_optional_identity(req.headers()).map(|user| user.id);

            let metric = build_request_metric(&path, user_agent, ip_address, user_id);

            // 落库等待有上限；超时或失败都只记日志，请求照常继续
            if let Some(recorder) = req.app_data::<web::Data<Arc<MetricsRecorder>>>() {
                let timeout_ms = crate::config::get_config().metrics.write_timeout_ms;
                match tokio::time::timeout(
                    Duration::from_millis(timeout_ms),
                    recorder.create_metric(metric),
                )
                .await
                {
                    Ok(Ok(_)) => {}
                    Ok(Err(e)) => error!("Error tracking metric for {}: {}", path, e),
                    Err(_) => error!(
                        "Metric write for {} timed out after {} ms",
                        path, timeout_ms
                    ),
                }
            } else {
                debug!("MetricsRecorder not registered, skipping instrumentation");
            }

            srv.call(req).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_paths() {
        assert!(should_skip_path("/styles/app.css"));
        assert!(should_skip_path("/favicon.ico"));
        assert!(should_skip_path("/metrics"));
        assert!(should_skip_path("/metrics/bots/count"));
        assert!(should_skip_path("/uploads/cv.pdf"));
        assert!(should_skip_path("/uploads/photo"));

        assert!(!should_skip_path("/"));
        assert!(!should_skip_path("/projects"));
        assert!(!should_skip_path("/cv"));
        assert!(!should_skip_path("/cv/download"));
    }

    #[test]
    fn test_plain_visit_metric() {
        let metric = build_request_metric(
            "/projects",
            Some("Mozilla/5.0 (X11; Linux x86_64)".to_string()),
            Some("203.0.113.5".to_string()),
            None,
        );

        assert_eq!(metric.metric_type, MetricType::Visit);
        assert_eq!(metric.path, "/projects");
        let metadata = metric.metadata.unwrap();
        assert_eq!(metadata["isBot"], false);
        assert!(metadata.get("botType").is_none());
        assert!(metadata.get("cvAccess").is_none());
    }

    #[test]
    fn test_bot_metric() {
        let metric = build_request_metric(
            "/projects",
            Some("Googlebot/2.1 (+http://www.google.com/bot.html)".to_string()),
            Some("203.0.113.5".to_string()),
            None,
        );

        assert_eq!(metric.metric_type, MetricType::Bot);
        let metadata = metric.metadata.unwrap();
        assert_eq!(metadata["isBot"], true);
        assert_eq!(metadata["botType"], "Googlebot");
    }

    #[test]
    fn test_cv_subpath_canonicalized() {
        let metric = build_request_metric(
            "/cv/download",
            Some("Mozilla/5.0".to_string()),
            Some("203.0.113.5".to_string()),
            None,
        );

        assert_eq!(metric.metric_type, MetricType::CvVisit);
        assert_eq!(metric.path, "/cv");
        let metadata = metric.metadata.unwrap();
        assert_eq!(metadata["originalPath"], "/cv/download");
        assert_eq!(metadata["cvAccess"], true);
    }

    #[test]
    fn test_cv_visit_takes_precedence_over_bot() {
        let metric = build_request_metric(
            "/cv/download",
            Some("Googlebot/2.1".to_string()),
            Some("203.0.113.5".to_string()),
            None,
        );

        // 类型按 CV 归类，但分类细节还在 metadata 里
        assert_eq!(metric.metric_type, MetricType::CvVisit);
        assert_eq!(metric.path, "/cv");
        let metadata = metric.metadata.unwrap();
        assert_eq!(metadata["isBot"], true);
        assert_eq!(metadata["botType"], "Googlebot");
        assert_eq!(metadata["cvAccess"], true);
    }

    #[test]
    fn test_cv_prefix_requires_boundary() {
        // /cvsomething 不是 CV 路径
        let metric = build_request_metric("/cvsomething", None, None, None);
        assert_eq!(metric.metric_type, MetricType::Visit);
        assert_eq!(metric.path, "/cvsomething");
    }

    #[test]
    fn test_user_id_carried_through() {
        let metric = build_request_metric("/", None, None, Some("user-1".to_string()));
        assert_eq!(metric.user_id.as_deref(), Some("user-1"));
    }
}
