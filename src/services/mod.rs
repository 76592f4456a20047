pub mod auth_service;
pub mod contact_service;
pub mod metrics_service;

pub use auth_service::AuthService;
pub use contact_service::ContactService;
pub use metrics_service::MetricsQueryService;
