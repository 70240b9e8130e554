use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub role: String,
    pub iat: Option<u64>,
    pub exp: Option<u64>,
}

/// The authenticated `{username, role}` pair carried through request
/// extensions once the bearer token has been validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub username: String,
    pub role: String,
}

impl SessionIdentity {
    pub fn new(username: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            role: role.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub username: String,
    pub role: String,
}
