// Re-export all model types for ease of use

pub(crate) mod lenient;
pub mod quiz;
pub mod responses;
pub mod stats;
pub mod user;

pub use quiz::*;
pub use responses::*;
pub use stats::*;
pub use user::*;
