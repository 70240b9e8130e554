use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub directory_store_url: String,
    pub directory_store_api_key: String,
    pub session_jwt_secret: String,
    pub mail_api_url: String,
    pub mail_sender: String,
    pub notify_topic_url: String,
    pub notify_topic: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            directory_store_url: env::var("DIRECTORY_STORE_URL")
                .unwrap_or_else(|_| {
                    warn!("DIRECTORY_STORE_URL not set, using empty value");
                    String::new()
                }),
            directory_store_api_key: env::var("DIRECTORY_STORE_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("DIRECTORY_STORE_API_KEY not set, using empty value");
                    String::new()
                }),
            session_jwt_secret: env::var("SESSION_JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("SESSION_JWT_SECRET not set, using empty value");
                    String::new()
                }),
            mail_api_url: env::var("MAIL_API_URL")
                .unwrap_or_else(|_| {
                    warn!("MAIL_API_URL not set, welcome emails disabled");
                    String::new()
                }),
            mail_sender: env::var("MAIL_SENDER")
                .unwrap_or_else(|_| "no-reply@medtrack.local".to_string()),
            notify_topic_url: env::var("NOTIFY_TOPIC_URL")
                .unwrap_or_else(|_| {
                    warn!("NOTIFY_TOPIC_URL not set, broadcast notifications disabled");
                    String::new()
                }),
            notify_topic: env::var("NOTIFY_TOPIC")
                .unwrap_or_else(|_| "medtrack-bookings".to_string()),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.directory_store_url.is_empty()
            && !self.directory_store_api_key.is_empty()
            && !self.session_jwt_secret.is_empty()
    }

    pub fn is_mail_configured(&self) -> bool {
        !self.mail_api_url.is_empty() && !self.mail_sender.is_empty()
    }

    pub fn is_broadcast_configured(&self) -> bool {
        !self.notify_topic_url.is_empty()
    }
}
