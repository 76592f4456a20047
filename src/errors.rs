use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum PortfolioError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Unauthorized(String),
    Serialization(String),
    DateParse(String),
    PasswordHash(String),
    TokenGeneration(String),
    MailDelivery(String),
}

impl PortfolioError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            PortfolioError::DatabaseConfig(_) => "E001",
            PortfolioError::DatabaseConnection(_) => "E002",
            PortfolioError::DatabaseOperation(_) => "E003",
            PortfolioError::FileOperation(_) => "E004",
            PortfolioError::Validation(_) => "E005",
            PortfolioError::NotFound(_) => "E006",
            PortfolioError::Unauthorized(_) => "E007",
            PortfolioError::Serialization(_) => "E008",
            PortfolioError::DateParse(_) => "E009",
            PortfolioError::PasswordHash(_) => "E010",
            PortfolioError::TokenGeneration(_) => "E011",
            PortfolioError::MailDelivery(_) => "E012",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            PortfolioError::DatabaseConfig(_) => "Database Configuration Error",
            PortfolioError::DatabaseConnection(_) => "Database Connection Error",
            PortfolioError::DatabaseOperation(_) => "Database Operation Error",
            PortfolioError::FileOperation(_) => "File Operation Error",
            PortfolioError::Validation(_) => "Validation Error",
            PortfolioError::NotFound(_) => "Resource Not Found",
            PortfolioError::Unauthorized(_) => "Unauthorized",
            PortfolioError::Serialization(_) => "Serialization Error",
            PortfolioError::DateParse(_) => "Date Parse Error",
            PortfolioError::PasswordHash(_) => "Password Hash Error",
            PortfolioError::TokenGeneration(_) => "Token Generation Error",
            PortfolioError::MailDelivery(_) => "Mail Delivery Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            PortfolioError::DatabaseConfig(msg)
            | PortfolioError::DatabaseConnection(msg)
            | PortfolioError::DatabaseOperation(msg)
            | PortfolioError::FileOperation(msg)
            | PortfolioError::Validation(msg)
            | PortfolioError::NotFound(msg)
            | PortfolioError::Unauthorized(msg)
            | PortfolioError::Serialization(msg)
            | PortfolioError::DateParse(msg)
            | PortfolioError::PasswordHash(msg)
            | PortfolioError::TokenGeneration(msg)
            | PortfolioError::MailDelivery(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            PortfolioError::Validation(_) | PortfolioError::DateParse(_) => StatusCode::BAD_REQUEST,
            PortfolioError::NotFound(_) => StatusCode::NOT_FOUND,
            PortfolioError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for PortfolioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type(), self.message())
    }
}

impl std::error::Error for PortfolioError {}

// 便捷的构造函数
impl PortfolioError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        PortfolioError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        PortfolioError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        PortfolioError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        PortfolioError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        PortfolioError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        PortfolioError::NotFound(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        PortfolioError::Unauthorized(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        PortfolioError::Serialization(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        PortfolioError::DateParse(msg.into())
    }

    pub fn password_hash<T: Into<String>>(msg: T) -> Self {
        PortfolioError::PasswordHash(msg.into())
    }

    pub fn token_generation<T: Into<String>>(msg: T) -> Self {
        PortfolioError::TokenGeneration(msg.into())
    }

    pub fn mail_delivery<T: Into<String>>(msg: T) -> Self {
        PortfolioError::MailDelivery(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for PortfolioError {
    fn from(err: sea_orm::DbErr) -> Self {
        PortfolioError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for PortfolioError {
    fn from(err: std::io::Error) -> Self {
        PortfolioError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for PortfolioError {
    fn from(err: serde_json::Error) -> Self {
        PortfolioError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for PortfolioError {
    fn from(err: chrono::ParseError) -> Self {
        PortfolioError::DateParse(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for PortfolioError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        PortfolioError::TokenGeneration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PortfolioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(PortfolioError::validation("x").code(), "E005");
        assert_eq!(PortfolioError::not_found("x").code(), "E006");
        assert_eq!(PortfolioError::unauthorized("x").code(), "E007");
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            PortfolioError::validation("bad").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PortfolioError::not_found("gone").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            PortfolioError::unauthorized("no").http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            PortfolioError::database_operation("boom").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_display_format() {
        let err = PortfolioError::not_found("hero abc not found");
        assert_eq!(err.to_string(), "Resource Not Found: hero abc not found");
    }

    #[test]
    fn test_from_db_err() {
        let err: PortfolioError = sea_orm::DbErr::Custom("broken".to_string()).into();
        assert!(matches!(err, PortfolioError::DatabaseOperation(_)));
    }
}
