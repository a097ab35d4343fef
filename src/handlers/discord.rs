use std::sync::Arc;

use serenity::all::{Context, EventHandler, Ready, ResumedEvent};
use serenity::async_trait;
use tracing::info;

use crate::notifier::{DiscordMessenger, Notifier};
use crate::schedule::ScheduleManager;

/// Bridges gateway lifecycle events into the notifier and the scheduler.
/// Nothing is sent before the first `ready` event has fired.
pub struct BotHandler {
    pub messenger: Arc<DiscordMessenger>,
    pub notifier: Arc<Notifier>,
    pub manager: Arc<ScheduleManager>,
}

#[async_trait]
impl EventHandler for BotHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            "Client is ready as {}! Starting class notification bot...",
            ready.user.name
        );
        self.messenger.attach(ctx.http.clone());
        self.notifier.set_ready();

        self.notifier.send_test_message().await;
        self.manager.reschedule().await;
    }

    async fn resume(&self, _ctx: Context, _resume: ResumedEvent) {
        info!("Gateway session resumed");
    }
}
