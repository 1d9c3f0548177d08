pub mod drugs;
pub mod error;
pub mod health;

pub use error::{ApiError, AppError};
