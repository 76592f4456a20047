pub mod backend;
pub mod models;

pub use backend::{MetricFilter, SeaOrmStorage};
