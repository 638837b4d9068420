pub mod locale;
pub mod models;
pub mod prediction;
pub mod resolver;

pub use models::*;
pub use prediction::{predict_yield, run_yield_command, YieldParams};
pub use resolver::{normalize_text, resolve};
