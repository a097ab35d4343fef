use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::info;

use crate::config::{BotConfig, ConfigUpdate};
use crate::error::InvalidInput;
use crate::timetable::Timetable;

/// Bot state shared between the scheduler, the notifier and the control surface
pub struct Data {
    /// Runtime configuration
    pub config: RwLock<BotConfig>,
    /// Weekly class timetable
    pub timetable: RwLock<Timetable>,
    /// Process start instant, reported by the status endpoint
    pub started_at: DateTime<Utc>,
}

impl Data {
    /// Create shared state with the default weekly timetable
    pub fn new(config: BotConfig) -> Self {
        Self {
            config: RwLock::new(config),
            timetable: RwLock::new(Timetable::default()),
            started_at: Utc::now(),
        }
    }

    /// Shallow-merge a partial configuration update.
    /// Does not re-arm timers; changes apply on the next scheduling pass.
    pub async fn update_config(&self, update: ConfigUpdate) -> Result<(), InvalidInput> {
        let mut config = self.config.write().await;
        config.apply(update)?;
        info!("Configuration updated: {:?}", *config);
        Ok(())
    }
}
