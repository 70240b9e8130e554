use reqwest::Client;
use serde_json::json;
use tracing::{debug, error, info};

use shared_config::AppConfig;

/// Best-effort fan-out of booking events: a publish/subscribe topic for
/// broadcast alerts and a transactional mail API for direct recipients.
///
/// Nothing here returns a `Result`. Every failure is logged and discarded
/// at this boundary; no stored state depends on a notification landing.
#[derive(Clone)]
pub struct NotificationDispatcher {
    client: Client,
    topic_url: String,
    topic: String,
    mail_api_url: String,
    mail_sender: String,
}

impl NotificationDispatcher {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            topic_url: config.notify_topic_url.clone(),
            topic: config.notify_topic.clone(),
            mail_api_url: config.mail_api_url.clone(),
            mail_sender: config.mail_sender.clone(),
        }
    }

    /// Publish a message to the broadcast topic. No-op when no topic is
    /// configured. Single attempt, no retry.
    pub async fn broadcast(&self, message: &str) {
        if self.topic_url.is_empty() {
            debug!("No broadcast topic configured, skipping notification");
            return;
        }

        let body = json!({
            "topic": self.topic,
            "subject": "MedTrack Notification",
            "message": message,
        });

        match self.client.post(&self.topic_url).json(&body).send().await {
            Ok(response) if response.status().is_success() => {
                info!("Broadcast notification published to {}", self.topic);
            }
            Ok(response) => {
                error!("Broadcast error: topic endpoint returned {}", response.status());
            }
            Err(e) => {
                error!("Broadcast error: {}", e);
            }
        }
    }

    /// Send the registration welcome email. No-op when mail is not
    /// configured; failures are swallowed like broadcast failures.
    pub async fn send_welcome_email(&self, recipient: &str, role: &str) {
        if self.mail_api_url.is_empty() {
            debug!("No mail API configured, skipping welcome email");
            return;
        }

        let body = json!({
            "from": self.mail_sender,
            "to": [recipient],
            "subject": "Welcome to MedTrack!",
            "body": format!(
                "Hello {},\n\nThank you for registering as a {} on MedTrack.",
                recipient, role
            ),
        });

        match self.client.post(&self.mail_api_url).json(&body).send().await {
            Ok(response) if response.status().is_success() => {
                info!("Welcome email sent to {}", recipient);
            }
            Ok(response) => {
                error!("Email error: mail API returned {}", response.status());
            }
            Err(e) => {
                error!("Email error: {}", e);
            }
        }
    }

    /// Fire-and-forget broadcast on a detached task. The triggering request
    /// never observes the outcome.
    pub fn spawn_broadcast(&self, message: String) {
        let dispatcher = self.clone();
        tokio::spawn(async move {
            dispatcher.broadcast(&message).await;
        });
    }

    /// Fire-and-forget welcome email on a detached task.
    pub fn spawn_welcome_email(&self, recipient: String, role: String) {
        let dispatcher = self.clone();
        tokio::spawn(async move {
            dispatcher.send_welcome_email(&recipient, &role).await;
        });
    }
}
