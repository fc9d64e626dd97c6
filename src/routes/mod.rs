pub mod estimate;
pub mod health_checks;
pub mod session;

pub use health_checks::*;
