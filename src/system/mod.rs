pub mod logging;
pub mod startup;

pub use logging::init_logging;
pub use startup::run_startup_tasks;
