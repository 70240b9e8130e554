use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use tracing::{debug, info, warn};

use notification_cell::NotificationDispatcher;
use shared_config::AppConfig;
use shared_database::directory::{DirectoryClient, StoreError, USERS};
use shared_models::auth::{SessionIdentity, TokenResponse};
use shared_models::records::{User, ROLE_DOCTOR, ROLE_PATIENT};
use shared_utils::jwt::issue_token;

use crate::models::{AccountError, LoginRequest, RegisterRequest};

/// Registration and credential checks against the directory store.
pub struct AccountService {
    store: DirectoryClient,
    dispatcher: NotificationDispatcher,
    jwt_secret: String,
}

impl AccountService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: DirectoryClient::new(config),
            dispatcher: NotificationDispatcher::new(config),
            jwt_secret: config.session_jwt_secret.clone(),
        }
    }

    /// Create a login account. The pre-check gives the friendly duplicate
    /// message; the conditional insert underneath closes the window where
    /// two concurrent registrations both pass the check.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, AccountError> {
        debug!("Registering {} account for {}", request.role, request.username);

        if request.role != ROLE_PATIENT && request.role != ROLE_DOCTOR {
            return Err(AccountError::InvalidRole(request.role));
        }

        let existing: Option<User> = self
            .store
            .get_by_key(USERS.name, USERS.hash_key, &request.username)
            .await?;
        if existing.is_some() {
            return Err(AccountError::AlreadyExists);
        }

        let user = User {
            username: request.username,
            password: hash_password(&request.password)?,
            role: request.role,
        };

        let stored = match self.store.insert(USERS.name, &user).await {
            Ok(stored) => stored,
            Err(StoreError::Conflict(_)) => {
                // Lost the race to a concurrent registration for the same
                // username; surface it the same way as the pre-check.
                warn!("Concurrent registration detected for {}", user.username);
                return Err(AccountError::AlreadyExists);
            }
            Err(e) => return Err(e.into()),
        };

        info!("Registered new {} account: {}", stored.role, stored.username);

        // Welcome email is advisory; registration has already succeeded.
        self.dispatcher
            .spawn_welcome_email(stored.username.clone(), stored.role.clone());

        Ok(stored)
    }

    /// Check a username/password pair and issue a session token. Unknown
    /// user and wrong password are indistinguishable to the caller.
    pub async fn authenticate(&self, request: LoginRequest) -> Result<TokenResponse, AccountError> {
        debug!("Authenticating {}", request.username);

        let user: Option<User> = self
            .store
            .get_by_key(USERS.name, USERS.hash_key, &request.username)
            .await?;

        let user = user.ok_or(AccountError::InvalidCredentials)?;

        if !verify_password(&request.password, &user.password) {
            return Err(AccountError::InvalidCredentials);
        }

        let identity = SessionIdentity::new(user.username, user.role);
        let token = issue_token(&identity, &self.jwt_secret).map_err(AccountError::Token)?;

        info!("Issued session for {} ({})", identity.username, identity.role);

        Ok(TokenResponse {
            token,
            username: identity.username,
            role: identity.role,
        })
    }
}

/// Argon2 PHC-string hash of a raw password. Only the hash ever reaches the
/// directory store.
pub fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AccountError::PasswordHash)
}

pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
