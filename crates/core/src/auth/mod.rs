mod error;
mod functions;
mod types;
mod validation;

pub use error::AuthError;
pub use functions::{build_claims, calculate_expiry, email_to_name};
pub use types::{Claims, NewUser, Role, User, UserCredentials};
pub use validation::{normalize_email, validate_email, validate_password};
