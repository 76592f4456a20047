//! 认证相关端点

use std::sync::Arc;

use actix_governor::{Governor, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError};
use actix_web::dev::ServiceRequest;
use actix_web::http::StatusCode;
use actix_web::{HttpMessage, HttpRequest, Responder, Result as ActixResult, web};
use governor::middleware::NoOpMiddleware;
use tracing::{error, info, warn};

use crate::api::jwt::get_jwt_service;
use crate::api::middleware::AuthenticatedUser;
use crate::config::get_config;
use crate::services::AuthService;
use crate::storage::SeaOrmStorage;
use crate::storage::models::User;

use super::error_code::ErrorCode;
use super::helpers::{error_from_portfolio, error_response, success_response};
use super::types::{
    AuthTokensResponse, LoginCredentials, MessageResponse, PasswordResetConfirm,
    PasswordResetRequest, RefreshRequest,
};

/// 基于连接 IP 的限流 key 提取器
#[derive(Clone, Copy)]
pub struct LoginKeyExtractor;

impl KeyExtractor for LoginKeyExtractor {
    type Key = String;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        // Unix socket 等场景没有对端地址，统一落到一个共享桶
        Ok(req
            .connection_info()
            .peer_addr()
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "unknown".to_string()))
    }
}

/// 创建登录限流器
///
/// 配置：每秒补充 1 个令牌，突发最多 5 次请求
/// 超限返回 HTTP 429 Too Many Requests
pub fn login_rate_limiter() -> Governor<LoginKeyExtractor, NoOpMiddleware> {
    let config = GovernorConfigBuilder::default()
        .seconds_per_request(1)
        .burst_size(5)
        .key_extractor(LoginKeyExtractor)
        .finish()
        .expect("Invalid rate limit config");

    Governor::new(&config)
}

/// 刷新限流器：比登录宽松一些
pub fn refresh_rate_limiter() -> Governor<LoginKeyExtractor, NoOpMiddleware> {
    let config = GovernorConfigBuilder::default()
        .seconds_per_request(1)
        .burst_size(10)
        .key_extractor(LoginKeyExtractor)
        .finish()
        .expect("Invalid rate limit config");

    Governor::new(&config)
}

fn issue_tokens(user_id: &str, email: &str) -> Result<AuthTokensResponse, actix_web::HttpResponse> {
    let jwt_service = get_jwt_service();

    let access_token = jwt_service.generate_access_token(user_id, email).map_err(|e| {
        error!("Failed to generate access token: {}", e);
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServerError,
            "Failed to generate token",
        )
    })?;

    let refresh_token = jwt_service
        .generate_refresh_token(user_id, email)
        .map_err(|e| {
            error!("Failed to generate refresh token: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Failed to generate token",
            )
        })?;

    Ok(AuthTokensResponse {
        access_token,
        refresh_token,
        expires_in: get_config().api.access_token_minutes * 60,
    })
}

/// 登录：邮箱 + 密码换 token 对
pub async fn login(
    auth_service: web::Data<Arc<AuthService>>,
    body: web::Json<LoginCredentials>,
) -> ActixResult<impl Responder> {
    let credentials = body.into_inner();
    info!("Login attempt received for email: {}", credentials.email);

    let user = match auth_service
        .validate_user(&credentials.email, &credentials.password)
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!("Login failed for email: {}", credentials.email);
            return Ok(error_response(
                StatusCode::UNAUTHORIZED,
                ErrorCode::AuthFailed,
                "Invalid credentials",
            ));
        }
        Err(e) => return Ok(error_from_portfolio(&e)),
    };

    match issue_tokens(&user.id, &user.email) {
        Ok(tokens) => {
            info!("Login successful for email: {}", user.email);
            Ok(success_response(tokens))
        }
        Err(response) => Ok(response),
    }
}

/// 刷新 token（滑动过期）
pub async fn refresh_token(body: web::Json<RefreshRequest>) -> ActixResult<impl Responder> {
    let jwt_service = get_jwt_service();

    let claims = match jwt_service.validate_refresh_token(&body.refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("Invalid refresh token: {}", e);
            return Ok(error_response(
                StatusCode::UNAUTHORIZED,
                ErrorCode::TokenInvalid,
                "Invalid refresh token",
            ));
        }
    };

    match issue_tokens(&claims.sub, &claims.email) {
        Ok(tokens) => {
            info!("Token refresh successful for {}", claims.email);
            Ok(success_response(tokens))
        }
        Err(response) => Ok(response),
    }
}

/// 登出：token 无状态，这里只是确认
pub async fn logout(req: HttpRequest) -> ActixResult<impl Responder> {
    if let Some(user) = req.extensions().get::<AuthenticatedUser>() {
        info!("Logout for user: {}", user.email);
    }
    Ok(success_response(MessageResponse {
        message: "Logout successful".to_string(),
    }))
}

/// 验证 token - 如果中间件通过，则 token 有效
pub async fn verify_token(_req: HttpRequest) -> ActixResult<impl Responder> {
    Ok(success_response(MessageResponse {
        message: "Token is valid".to_string(),
    }))
}

/// 当前登录用户信息
pub async fn me(
    req: HttpRequest,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    let Some(user) = req.extensions().get::<AuthenticatedUser>().cloned() else {
        return Ok(error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            "Unauthorized",
        ));
    };

    match storage.user_by_id(&user.id).await {
        Ok(Some(model)) => Ok(success_response(User::from(model))),
        Ok(None) => Ok(error_response(
            StatusCode::NOT_FOUND,
            ErrorCode::NotFound,
            "User not found",
        )),
        Err(e) => Ok(error_from_portfolio(&e)),
    }
}

/// 发起密码重置；不论账号是否存在都回同一句话
pub async fn request_password_reset(
    auth_service: web::Data<Arc<AuthService>>,
    body: web::Json<PasswordResetRequest>,
) -> ActixResult<impl Responder> {
    let config = get_config();
    match auth_service
        .request_password_reset(
            &body.email,
            &config.api.frontend_url,
            config.api.reset_token_minutes,
        )
        .await
    {
        Ok(_) => Ok(success_response(MessageResponse {
            message: "If the account exists, a reset email has been sent".to_string(),
        })),
        Err(e) => Ok(error_from_portfolio(&e)),
    }
}

/// 用重置 token 设置新密码
pub async fn confirm_password_reset(
    auth_service: web::Data<Arc<AuthService>>,
    body: web::Json<PasswordResetConfirm>,
) -> ActixResult<impl Responder> {
    if body.new_password.len() < 8 {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::BadRequest,
            "Password must be at least 8 characters",
        ));
    }

    match auth_service
        .reset_password(&body.token, &body.new_password)
        .await
    {
        Ok(true) => Ok(success_response(MessageResponse {
            message: "Password reset successful".to_string(),
        })),
        Ok(false) => Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::BadRequest,
            "Invalid or expired reset token",
        )),
        Err(e) => Ok(error_from_portfolio(&e)),
    }
}
