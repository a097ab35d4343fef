use chrono_tz::Tz;
use serde::Deserialize;

use crate::constants::{DEFAULT_LEAD_MINUTES, DEFAULT_NOTIFY_MESSAGE};
use crate::error::InvalidInput;

/// Runtime configuration, mutable through the control surface.
/// Armed timers do not pick up changes until the next scheduling pass.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Discord user id of the contact to notify
    pub recipient: String,
    /// Minutes before a class end at which to fire (0-1439)
    pub lead_minutes: u32,
    /// IANA timezone the timetable is expressed in
    pub timezone: Tz,
    /// Text appended to every class notification
    pub message: String,
}

/// Partial update applied to `BotConfig` with a shallow merge
#[derive(Debug, Default, Deserialize)]
pub struct ConfigUpdate {
    pub recipient: Option<String>,
    pub lead_minutes: Option<u32>,
    pub timezone: Option<String>,
    pub message: Option<String>,
}

impl BotConfig {
    /// Load runtime configuration from environment variables
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let recipient = std::env::var("RECIPIENT_USER_ID")
            .map_err(|_| "RECIPIENT_USER_ID environment variable not set. Set it with: export RECIPIENT_USER_ID=discord_user_id")?;

        let lead_minutes = match std::env::var("LEAD_MINUTES") {
            Ok(raw) => raw
                .parse::<u32>()
                .map_err(|_| format!("LEAD_MINUTES must be a number, got '{}'", raw))?,
            Err(_) => DEFAULT_LEAD_MINUTES,
        };
        if lead_minutes >= 1440 {
            return Err(InvalidInput::LeadOutOfRange(lead_minutes).into());
        }

        let timezone = match std::env::var("TIMEZONE") {
            Ok(raw) => parse_timezone(&raw)?,
            Err(_) => chrono_tz::UTC,
        };

        let message =
            std::env::var("NOTIFY_MESSAGE").unwrap_or_else(|_| DEFAULT_NOTIFY_MESSAGE.to_string());

        Ok(Self {
            recipient,
            lead_minutes,
            timezone,
            message,
        })
    }

    /// Merge a partial update into the configuration.
    /// Every field is validated before any of them is applied, so a rejected
    /// update leaves the configuration untouched.
    pub fn apply(&mut self, update: ConfigUpdate) -> Result<(), InvalidInput> {
        let timezone = match update.timezone.as_deref() {
            Some(raw) => Some(parse_timezone(raw)?),
            None => None,
        };
        if let Some(lead) = update.lead_minutes {
            if lead >= 1440 {
                return Err(InvalidInput::LeadOutOfRange(lead));
            }
        }

        if let Some(recipient) = update.recipient {
            self.recipient = recipient;
        }
        if let Some(lead) = update.lead_minutes {
            self.lead_minutes = lead;
        }
        if let Some(tz) = timezone {
            self.timezone = tz;
        }
        if let Some(message) = update.message {
            self.message = message;
        }
        Ok(())
    }
}

/// Parse an IANA timezone name
pub fn parse_timezone(tz_str: &str) -> Result<Tz, InvalidInput> {
    tz_str
        .parse()
        .map_err(|_| InvalidInput::BadTimezone(tz_str.to_string()))
}
