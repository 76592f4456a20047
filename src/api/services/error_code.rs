//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字。按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 内容实体错误
/// - 4000-4099: 上传错误
/// - 5000-5099: 邮件错误
/// - 6000-6099: 指标错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,
    FileTooLarge = 1011,
    InvalidDateFormat = 1012,

    // 认证错误 2000-2099
    AuthFailed = 2000,
    TokenInvalid = 2002,
    RateLimitExceeded = 2004,

    // 内容实体错误 3000-3099
    HeroNotFound = 3000,
    CvNotFound = 3001,
    ProjectNotFound = 3002,
    CategoryNotFound = 3003,
    BadgeNotFound = 3004,
    ContactNotFound = 3005,

    // 上传错误 4000-4099
    InvalidMultipartData = 4000,
    UnsupportedFileType = 4001,
    UploadFailed = 4002,

    // 邮件错误 5000-5099
    MailSendFailed = 5000,

    // 指标错误 6000-6099
    MetricInvalidType = 6000,
    MetricQueryFailed = 6001,
}

impl From<&crate::errors::PortfolioError> for ErrorCode {
    fn from(err: &crate::errors::PortfolioError) -> Self {
        use crate::errors::PortfolioError;
        match err {
            PortfolioError::Validation(_) => ErrorCode::BadRequest,
            PortfolioError::NotFound(_) => ErrorCode::NotFound,
            PortfolioError::Unauthorized(_) => ErrorCode::Unauthorized,
            PortfolioError::DateParse(_) => ErrorCode::InvalidDateFormat,
            PortfolioError::MailDelivery(_) => ErrorCode::MailSendFailed,
            _ => ErrorCode::InternalServerError,
        }
    }
}
