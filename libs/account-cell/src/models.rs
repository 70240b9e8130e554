use serde::{Deserialize, Serialize};

use shared_database::directory::StoreError;
use shared_models::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub role: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("User already exists!")]
    AlreadyExists,

    #[error("Invalid credentials!")]
    InvalidCredentials,

    #[error("Unknown role: {0}")]
    InvalidRole(String),

    #[error("Password hashing failed")]
    PasswordHash,

    #[error("Session token error: {0}")]
    Token(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::AlreadyExists => AppError::Conflict(err.to_string()),
            AccountError::InvalidCredentials => AppError::Auth(err.to_string()),
            AccountError::InvalidRole(_) => AppError::BadRequest(err.to_string()),
            AccountError::PasswordHash | AccountError::Token(_) => {
                AppError::Internal(err.to_string())
            }
            AccountError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}
