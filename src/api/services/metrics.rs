//! 指标上报与查询端点
//!
//! 写入端点（POST /metrics、/metrics/visit、/metrics/cv-click）对匿名
//! 访客开放：留言表单和 CV 点击埋点必须在未登录时工作。查询端点
//! 全部要求管理员身份。这里是指标错误唯一允许冒泡给 HTTP 调用方的
//! 地方：对显式上报而言写入本身就是请求的目的，不再是副作用。

use std::str::FromStr;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, Result as ActixResult, web};
use serde_json::json;

use crate::analytics::{MetricType, MetricsRecorder, NewMetric};
use crate::api::constants::CV_CANONICAL_PATH;
use crate::api::middleware::auth::extract_optional_identity;
use crate::services::MetricsQueryService;
use crate::utils::ip::extract_client_ip;

use super::error_code::ErrorCode;
use super::helpers::{
    api_result, error_from_portfolio, error_response, parse_date_param, parse_metric_type,
    success_response,
};
use super::types::{
    CountResponse, CreateMetricRequest, CvClickRequest, DateQuery, MetricPathQuery,
    MetricTypeQuery, MetricUserQuery, TrackVisitRequest,
};

/// POST /metrics - 显式写入一条指标
pub async fn create_metric(
    recorder: web::Data<Arc<MetricsRecorder>>,
    body: web::Json<CreateMetricRequest>,
) -> ActixResult<impl Responder> {
    let request = body.into_inner();

    let metric_type = match MetricType::from_str(&request.metric_type) {
        Ok(metric_type) => metric_type,
        Err(e) => {
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::MetricInvalidType,
                &e,
            ));
        }
    };

    if request.path.trim().is_empty() {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::BadRequest,
            "path must not be empty",
        ));
    }

    let metric = NewMetric {
        metric_type,
        path: request.path,
        user_id: request.user_id,
        user_agent: request.user_agent,
        ip_address: request.ip_address,
        metadata: request.metadata,
    };

    Ok(api_result(recorder.create_metric(metric).await))
}

/// POST /metrics/visit - 便捷访问埋点，失败返回 skipped 而不是错误
pub async fn track_visit(
    recorder: web::Data<Arc<MetricsRecorder>>,
    body: web::Json<TrackVisitRequest>,
) -> ActixResult<impl Responder> {
    let request = body.into_inner();

    if request.path.trim().is_empty() {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::BadRequest,
            "path must not be empty",
        ));
    }

    let outcome = recorder
        .track_visit(
            request.path,
            request.user_id,
            request.user_agent,
            request.ip_address,
            request.metadata,
        )
        .await;

    Ok(success_response(outcome))
}

/// POST /metrics/cv-click - 记录一次 CV 下载点击（匿名可用）
pub async fn track_cv_click(
    req: HttpRequest,
    recorder: web::Data<Arc<MetricsRecorder>>,
    body: Option<web::Json<CvClickRequest>>,
) -> ActixResult<impl Responder> {
    let cv_id = body.and_then(|b| b.into_inner().cv_id);

    let user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|h| h.to_str().ok())
        .map(String::from);
    let ip_address = extract_client_ip(&req);
    let user_id = extract_optional_identity(req.headers()).map(|user| user.id);

    let metric = NewMetric {
        metric_type: MetricType::CvClick,
        path: CV_CANONICAL_PATH.to_string(),
        user_id,
        user_agent,
        ip_address,
        metadata: Some(json!({ "cvId": cv_id, "isClick": true })),
    };

    Ok(api_result(recorder.create_metric(metric).await))
}

// ============ 查询端点（管理员） ============

/// GET /metrics
pub async fn get_metrics(
    query_service: web::Data<Arc<MetricsQueryService>>,
    query: web::Query<MetricTypeQuery>,
) -> ActixResult<impl Responder> {
    let metric_type = match parse_metric_type(query.metric_type.as_deref()) {
        Ok(t) => t,
        Err(response) => return Ok(response),
    };
    Ok(api_result(query_service.get_metrics(metric_type).await))
}

/// GET /metrics/path
pub async fn get_metrics_by_path(
    query_service: web::Data<Arc<MetricsQueryService>>,
    query: web::Query<MetricPathQuery>,
) -> ActixResult<impl Responder> {
    let metric_type = match parse_metric_type(query.metric_type.as_deref()) {
        Ok(t) => t,
        Err(response) => return Ok(response),
    };
    Ok(api_result(
        query_service
            .get_metrics_by_path(&query.path, metric_type)
            .await,
    ))
}

/// GET /metrics/user
pub async fn get_metrics_by_user(
    query_service: web::Data<Arc<MetricsQueryService>>,
    query: web::Query<MetricUserQuery>,
) -> ActixResult<impl Responder> {
    let metric_type = match parse_metric_type(query.metric_type.as_deref()) {
        Ok(t) => t,
        Err(response) => return Ok(response),
    };
    Ok(api_result(
        query_service
            .get_metrics_by_user(&query.user_id, metric_type)
            .await,
    ))
}

/// GET /metrics/count
pub async fn get_metric_count(
    query_service: web::Data<Arc<MetricsQueryService>>,
    query: web::Query<MetricTypeQuery>,
) -> ActixResult<impl Responder> {
    let metric_type = match parse_metric_type(query.metric_type.as_deref()) {
        Ok(t) => t,
        Err(response) => return Ok(response),
    };
    match query_service.get_metric_count(metric_type).await {
        Ok(count) => Ok(success_response(CountResponse { count })),
        Err(e) => Ok(error_from_portfolio(&e)),
    }
}

/// GET /metrics/bots
pub async fn get_bot_metrics(
    query_service: web::Data<Arc<MetricsQueryService>>,
    query: web::Query<MetricTypeQuery>,
) -> ActixResult<impl Responder> {
    let metric_type = match parse_metric_type(query.metric_type.as_deref()) {
        Ok(t) => t,
        Err(response) => return Ok(response),
    };
    Ok(api_result(query_service.get_bot_metrics(metric_type).await))
}

/// GET /metrics/real-users
pub async fn get_real_user_metrics(
    query_service: web::Data<Arc<MetricsQueryService>>,
    query: web::Query<MetricTypeQuery>,
) -> ActixResult<impl Responder> {
    let metric_type = match parse_metric_type(query.metric_type.as_deref()) {
        Ok(t) => t,
        Err(response) => return Ok(response),
    };
    Ok(api_result(
        query_service.get_real_user_metrics(metric_type).await,
    ))
}

/// GET /metrics/bots/path
pub async fn get_bot_metrics_by_path(
    query_service: web::Data<Arc<MetricsQueryService>>,
    query: web::Query<MetricPathQuery>,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        query_service.get_bot_metrics_by_path(&query.path).await,
    ))
}

/// GET /metrics/real-users/path
pub async fn get_real_user_metrics_by_path(
    query_service: web::Data<Arc<MetricsQueryService>>,
    query: web::Query<MetricPathQuery>,
) -> ActixResult<impl Responder> {
    let metric_type = match parse_metric_type(query.metric_type.as_deref()) {
        Ok(t) => t,
        Err(response) => return Ok(response),
    };
    Ok(api_result(
        query_service
            .get_real_user_metrics_by_path(&query.path, metric_type)
            .await,
    ))
}

/// GET /metrics/bots/count
pub async fn get_bot_metric_count(
    query_service: web::Data<Arc<MetricsQueryService>>,
) -> ActixResult<impl Responder> {
    match query_service.get_bot_metric_count().await {
        Ok(count) => Ok(success_response(CountResponse { count })),
        Err(e) => Ok(error_from_portfolio(&e)),
    }
}

/// GET /metrics/real-users/count
pub async fn get_real_user_metric_count(
    query_service: web::Data<Arc<MetricsQueryService>>,
) -> ActixResult<impl Responder> {
    match query_service.get_real_user_metric_count().await {
        Ok(count) => Ok(success_response(CountResponse { count })),
        Err(e) => Ok(error_from_portfolio(&e)),
    }
}

/// GET /metrics/cv/count
pub async fn get_cv_visit_metric_count(
    query_service: web::Data<Arc<MetricsQueryService>>,
) -> ActixResult<impl Responder> {
    match query_service.get_cv_visit_metric_count().await {
        Ok(count) => Ok(success_response(CountResponse { count })),
        Err(e) => Ok(error_from_portfolio(&e)),
    }
}

/// GET /metrics/cv-clicks/count
pub async fn get_cv_click_metric_count(
    query_service: web::Data<Arc<MetricsQueryService>>,
) -> ActixResult<impl Responder> {
    match query_service.get_cv_click_metric_count().await {
        Ok(count) => Ok(success_response(CountResponse { count })),
        Err(e) => Ok(error_from_portfolio(&e)),
    }
}

/// GET /metrics/unique-users/count
pub async fn get_unique_users_count(
    query_service: web::Data<Arc<MetricsQueryService>>,
    query: web::Query<DateQuery>,
) -> ActixResult<impl Responder> {
    let date = match parse_date_param(query.date.as_deref()) {
        Ok(date) => date,
        Err(response) => return Ok(response),
    };
    match query_service.get_unique_users_per_day(date).await {
        Ok(count) => Ok(success_response(CountResponse { count })),
        Err(e) => Ok(error_from_portfolio(&e)),
    }
}

/// GET /metrics/unique-bots/count
pub async fn get_unique_bots_count(
    query_service: web::Data<Arc<MetricsQueryService>>,
    query: web::Query<DateQuery>,
) -> ActixResult<impl Responder> {
    let date = match parse_date_param(query.date.as_deref()) {
        Ok(date) => date,
        Err(response) => return Ok(response),
    };
    match query_service.get_unique_bots_per_day(date).await {
        Ok(count) => Ok(success_response(CountResponse { count })),
        Err(e) => Ok(error_from_portfolio(&e)),
    }
}

/// GET /metrics/unique-cv-clicks/count
pub async fn get_unique_cv_clicks_count(
    query_service: web::Data<Arc<MetricsQueryService>>,
    query: web::Query<DateQuery>,
) -> ActixResult<impl Responder> {
    let date = match parse_date_param(query.date.as_deref()) {
        Ok(date) => date,
        Err(response) => return Ok(response),
    };
    match query_service.get_unique_cv_clicks_per_day(date).await {
        Ok(count) => Ok(success_response(CountResponse { count })),
        Err(e) => Ok(error_from_portfolio(&e)),
    }
}
