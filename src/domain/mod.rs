pub mod error;
pub mod job_config;
pub mod range;
pub mod scheduler;

pub use error::AppError;
pub use job_config::JobConfig;
pub use range::{FloatRange, FloatSpacing, format_float, int_range};
pub use scheduler::Scheduler;
