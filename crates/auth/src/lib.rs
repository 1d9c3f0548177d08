//! Email/password authentication for the Patent Cliff API.
//!
//! This crate provides:
//! - argon2id password hashing
//! - HS256 JWT issue and verification
//! - Axum extractors for authenticated and admin users
//! - The `/register`, `/login`, `/me` and `/users` routes

mod config;
mod error;
mod extractors;
mod handlers;
mod password;
mod state;
mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::{AdminUser, CurrentUser};
pub use handlers::{auth_routes, AuthResponse, LoginRequest, RegisterRequest};
pub use password::{hash_password, verify_password};
pub use state::AuthState;
pub use token::{issue_token, verify_token};
