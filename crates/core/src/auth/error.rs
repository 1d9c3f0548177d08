use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email and password are required")]
    MissingCredentials,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Email already registered")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Access token required")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Admin access required")]
    Forbidden,

    #[error("User not found")]
    UserNotFound,

    #[error("storage error: {0}")]
    Storage(String),

    #[error("token error: {0}")]
    Token(String),

    #[error("password hashing error: {0}")]
    Hashing(String),
}
