//! API 帮助函数

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use chrono::NaiveDate;
use serde::Serialize;
use std::str::FromStr;

use crate::analytics::MetricType;
use crate::errors::PortfolioError;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 从 PortfolioError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
pub fn error_from_portfolio(err: &PortfolioError) -> HttpResponse {
    let status = err.http_status();
    let error_code = ErrorCode::from(err);
    error_response(status, error_code, err.message())
}

/// 统一 Result → HttpResponse 转换
///
/// 成功时返回 200 OK + JSON 数据，失败时自动映射 PortfolioError。
pub fn api_result<T, E>(result: Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<PortfolioError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => {
            let err: PortfolioError = e.into();
            error_from_portfolio(&err)
        }
    }
}

/// 针对"按 id 找实体"的统一转换：None → 指定的 404 错误码
pub fn api_result_found<T>(
    result: crate::errors::Result<Option<T>>,
    not_found_code: ErrorCode,
    not_found_message: &str,
) -> HttpResponse
where
    T: Serialize,
{
    match result {
        Ok(Some(data)) => success_response(data),
        Ok(None) => error_response(StatusCode::NOT_FOUND, not_found_code, not_found_message),
        Err(e) => error_from_portfolio(&e),
    }
}

/// 解析查询参数里的指标类型；未知标签报 400
pub fn parse_metric_type(raw: Option<&str>) -> Result<Option<MetricType>, HttpResponse> {
    match raw {
        None => Ok(None),
        Some(s) => MetricType::from_str(s).map(Some).map_err(|e| {
            error_response(StatusCode::BAD_REQUEST, ErrorCode::MetricInvalidType, &e)
        }),
    }
}

/// 解析 `date` 查询参数：YYYY-MM-DD，或任意以它开头的 ISO 时间串
pub fn parse_date_param(raw: Option<&str>) -> Result<Option<NaiveDate>, HttpResponse> {
    match raw {
        None => Ok(None),
        Some(s) => {
            let day_part = s.get(..10).unwrap_or(s);
            NaiveDate::parse_from_str(day_part, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| {
                    error_response(
                        StatusCode::BAD_REQUEST,
                        ErrorCode::InvalidDateFormat,
                        &format!("Invalid date: '{}'. Expected ISO date (YYYY-MM-DD)", s),
                    )
                })
        }
    }
}
