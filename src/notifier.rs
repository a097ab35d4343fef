use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use chrono::Utc;
use serenity::all::{Http, UserId};
use tracing::{error, info};

use crate::constants::TEST_MESSAGE;
use crate::error::SendError;
use crate::models::Data;

/// Transport seam for message delivery, injectable for tests
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Deliver `text` to the contact identified by `recipient`
    async fn send_text(&self, recipient: &str, text: &str) -> Result<(), SendError>;
}

/// Sends direct messages through the Discord gateway session
pub struct DiscordMessenger {
    http: OnceLock<Arc<Http>>,
}

impl DiscordMessenger {
    pub fn new() -> Self {
        Self {
            http: OnceLock::new(),
        }
    }

    /// Attach the gateway HTTP handle once the session signals ready.
    /// Reconnects re-fire ready with the same handle; the first one wins.
    pub fn attach(&self, http: Arc<Http>) {
        if self.http.set(http).is_err() {
            info!("Messaging session handle already attached");
        }
    }
}

#[async_trait]
impl Messenger for DiscordMessenger {
    async fn send_text(&self, recipient: &str, text: &str) -> Result<(), SendError> {
        let http = self.http.get().ok_or(SendError::SessionNotReady)?;

        let user_id: u64 = recipient
            .parse()
            .ok()
            .filter(|id| *id != 0)
            .ok_or_else(|| SendError::Transport(format!("invalid recipient id '{}'", recipient)))?;

        let channel = UserId::new(user_id)
            .create_dm_channel(http)
            .await
            .map_err(|e| SendError::Transport(e.to_string()))?;
        channel
            .say(http, text)
            .await
            .map_err(|e| SendError::Transport(e.to_string()))?;
        Ok(())
    }
}

/// Formats and dispatches notifications to the configured recipient.
/// Every failure is caught, logged and surfaced as `false`; one delivery
/// attempt per trigger, no retries.
pub struct Notifier {
    messenger: Arc<dyn Messenger>,
    data: Arc<Data>,
    ready: AtomicBool,
}

impl Notifier {
    pub fn new(messenger: Arc<dyn Messenger>, data: Arc<Data>) -> Self {
        Self {
            messenger,
            data,
            ready: AtomicBool::new(false),
        }
    }

    /// Mark the messaging session as ready to send
    pub fn set_ready(&self) {
        self.ready.store(true, Ordering::SeqCst);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Single delivery attempt to the configured recipient
    pub async fn send(&self, text: &str) -> bool {
        if !self.is_ready() {
            error!("Cannot send message: messaging session not ready");
            return false;
        }

        let recipient = self.data.config.read().await.recipient.clone();
        match self.messenger.send_text(&recipient, text).await {
            Ok(()) => {
                info!("Message sent at {}", Utc::now().format("%H:%M:%S"));
                true
            }
            Err(e) => {
                error!("Error sending message: {}", e);
                false
            }
        }
    }

    /// Templated class-ending notification
    pub async fn notify_class_ending(&self, class_name: &str, location: &str) -> bool {
        self.send_class_message(class_name, location, None).await
    }

    /// Class message, with the template replaced by `custom_text` when given
    pub async fn send_class_message(
        &self,
        class_name: &str,
        location: &str,
        custom_text: Option<String>,
    ) -> bool {
        let text = match custom_text {
            Some(text) => text,
            None => {
                let config = self.data.config.read().await;
                format!(
                    "Hey, class {} at {} ending soon. {}",
                    class_name, location, config.message
                )
            }
        };

        let sent = self.send(&text).await;
        if sent {
            info!("Message sent for {}", class_name);
        }
        sent
    }

    /// Fixed self-test message
    pub async fn send_test_message(&self) -> bool {
        let sent = self.send(TEST_MESSAGE).await;
        if sent {
            info!("Test message sent");
        }
        sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BotConfig;
    use tokio::sync::Mutex;

    /// Records every delivery, optionally failing each attempt
    struct RecordingMessenger {
        sent: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    impl RecordingMessenger {
        fn new(fail: bool) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait]
    impl Messenger for RecordingMessenger {
        async fn send_text(&self, recipient: &str, text: &str) -> Result<(), SendError> {
            if self.fail {
                return Err(SendError::Transport("connection reset".to_string()));
            }
            self.sent
                .lock()
                .await
                .push((recipient.to_string(), text.to_string()));
            Ok(())
        }
    }

    fn test_data() -> Arc<Data> {
        Arc::new(Data::new(BotConfig {
            recipient: "1234".to_string(),
            lead_minutes: 20,
            timezone: chrono_tz::UTC,
            message: "Please do proxy".to_string(),
        }))
    }

    #[tokio::test]
    async fn test_send_before_ready_returns_false() {
        let messenger = Arc::new(RecordingMessenger::new(false));
        let notifier = Notifier::new(messenger.clone(), test_data());

        assert!(!notifier.send("hello").await);
        assert!(messenger.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_send_returns_false_on_transport_failure() {
        let notifier = Notifier::new(Arc::new(RecordingMessenger::new(true)), test_data());
        notifier.set_ready();

        assert!(!notifier.send("hello").await);
    }

    #[tokio::test]
    async fn test_send_delivers_to_configured_recipient() {
        let messenger = Arc::new(RecordingMessenger::new(false));
        let notifier = Notifier::new(messenger.clone(), test_data());
        notifier.set_ready();

        assert!(notifier.send("hello").await);
        let sent = messenger.sent.lock().await;
        assert_eq!(sent.as_slice(), &[("1234".to_string(), "hello".to_string())]);
    }

    #[tokio::test]
    async fn test_notify_class_ending_formats_template() {
        let messenger = Arc::new(RecordingMessenger::new(false));
        let notifier = Notifier::new(messenger.clone(), test_data());
        notifier.set_ready();

        assert!(notifier.notify_class_ending("ADS", "TG-421").await);
        let sent = messenger.sent.lock().await;
        assert_eq!(
            sent[0].1,
            "Hey, class ADS at TG-421 ending soon. Please do proxy"
        );
    }

    #[tokio::test]
    async fn test_custom_text_overrides_template() {
        let messenger = Arc::new(RecordingMessenger::new(false));
        let notifier = Notifier::new(messenger.clone(), test_data());
        notifier.set_ready();

        assert!(
            notifier
                .send_class_message("Custom", "N/A", Some("see you at 5".to_string()))
                .await
        );
        let sent = messenger.sent.lock().await;
        assert_eq!(sent[0].1, "see you at 5");
    }

    #[tokio::test]
    async fn test_discord_messenger_not_ready_before_attach() {
        let messenger = DiscordMessenger::new();
        let result = messenger.send_text("1234", "hello").await;
        assert!(matches!(result, Err(SendError::SessionNotReady)));
    }
}
