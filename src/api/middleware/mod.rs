pub mod auth;
pub mod metrics;

pub use auth::{AdminAuth, AuthenticatedUser};
pub use metrics::TrafficMetrics;
