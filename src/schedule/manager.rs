use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Datelike, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use dashmap::DashMap;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::error::InvalidInput;
use crate::models::Data;
use crate::notifier::Notifier;
use crate::schedule::offset::{daily_cron_expr, fire_time};
use crate::timetable::{ClassEntry, weekday_name};

/// What an armed timer does when it fires
enum TimerAction {
    ClassEnding { name: String, location: String },
    CustomMessage { text: String },
    MidnightRollover,
}

/// An armed one-shot timer awaiting its fire time
struct ArmedTimer {
    label: String,
    handle: JoinHandle<()>,
}

/// Snapshot of "now" in the configured timezone
#[derive(Debug, Serialize)]
pub struct TimeInfo {
    pub timezone: String,
    pub local_time: String,
    pub weekday: String,
    pub utc_time: String,
}

/// Owns the armed-timer table and the daily clear-then-arm cycle.
///
/// Timers are one-shot per day: each fired timer removes its own table entry
/// before acting, and the midnight rollover timer re-derives the whole set
/// for the new day.
pub struct ScheduleManager {
    data: Arc<Data>,
    notifier: Arc<Notifier>,
    timers: DashMap<u64, ArmedTimer>,
    next_timer_id: AtomicU64,
}

impl ScheduleManager {
    /// Create a manager with no timers armed
    pub fn new(data: Arc<Data>, notifier: Arc<Notifier>) -> Arc<Self> {
        Arc::new(Self {
            data,
            notifier,
            timers: DashMap::new(),
            next_timer_id: AtomicU64::new(1),
        })
    }

    /// Cancel and drain every armed timer
    pub fn clear_armed(&self) {
        let count = self.timers.len();
        self.timers.retain(|_, timer| {
            debug!("Cancelling timer '{}'", timer.label);
            timer.handle.abort();
            false
        });
        info!("Cleared {} scheduled timer(s)", count);
    }

    /// Clear every armed timer, then arm today's class timers plus the
    /// midnight rollover. Clear-then-arm is not atomic across the two steps;
    /// a trigger landing in between is an accepted race.
    pub async fn reschedule(self: &Arc<Self>) {
        self.clear_armed();
        self.arm_today().await;
    }

    /// Arm one timer per class scheduled today, plus the midnight rollover
    async fn arm_today(self: &Arc<Self>) {
        let (tz, lead_minutes) = {
            let config = self.data.config.read().await;
            (config.timezone, config.lead_minutes)
        };
        let today = Utc::now().with_timezone(&tz).weekday();

        let entries: Vec<ClassEntry> = {
            let timetable = self.data.timetable.read().await;
            timetable
                .entries_for(today)
                .map(|entries| entries.to_vec())
                .unwrap_or_default()
        };

        if entries.is_empty() {
            info!("No classes scheduled for {}", weekday_name(today));
        } else {
            info!("Scheduling messages for {}", weekday_name(today));
            for entry in entries {
                let at = fire_time(entry.end_time, lead_minutes);
                info!(
                    "Scheduled message for {} at {} ({} minutes before {})",
                    entry.name,
                    at.format("%H:%M"),
                    lead_minutes,
                    entry.end_time.format("%H:%M"),
                );
                self.arm_at(
                    at,
                    tz,
                    format!("class {}", entry.name),
                    TimerAction::ClassEnding {
                        name: entry.name,
                        location: entry.location,
                    },
                );
            }
        }

        // Rollover timer: re-derive the whole day at 00:00 local
        self.arm_at(
            NaiveTime::MIN,
            tz,
            "midnight rollover".to_string(),
            TimerAction::MidnightRollover,
        );
    }

    /// Arm an ad-hoc timer sending `text` at the given local time.
    /// Like every other timer it is wiped by the next scheduling pass.
    pub async fn schedule_custom_message(
        self: &Arc<Self>,
        hour: u32,
        minute: u32,
        text: String,
    ) -> Result<u64, InvalidInput> {
        let at = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or(InvalidInput::BadClockTime { hour, minute })?;
        let tz = self.data.config.read().await.timezone;

        info!("Scheduling custom message for {:02}:{:02}", hour, minute);
        self.arm_at(at, tz, "custom message".to_string(), TimerAction::CustomMessage { text })
            .ok_or(InvalidInput::BadClockTime { hour, minute })
    }

    /// Number of armed timers, midnight rollover included
    pub fn armed_timer_count(&self) -> usize {
        self.timers.len()
    }

    /// Current time, weekday and zone as the scheduler sees them
    pub async fn current_time_info(&self) -> TimeInfo {
        let tz = self.data.config.read().await.timezone;
        let now = Utc::now().with_timezone(&tz);
        TimeInfo {
            timezone: tz.to_string(),
            local_time: now.to_rfc3339(),
            weekday: weekday_name(now.weekday()).to_string(),
            utc_time: Utc::now().to_rfc3339(),
        }
    }

    /// Replace a day's class list. When the day is "today" in the configured
    /// timezone, runs an immediate clear-then-arm pass so the change takes
    /// effect without waiting for midnight.
    pub async fn update_schedule_for_day(
        self: &Arc<Self>,
        day: Weekday,
        entries: Vec<ClassEntry>,
    ) {
        {
            let mut timetable = self.data.timetable.write().await;
            timetable.set_day(day, entries);
        }
        info!("Schedule for {} updated", weekday_name(day));

        let tz = self.data.config.read().await.timezone;
        let today = Utc::now().with_timezone(&tz).weekday();
        if day == today {
            self.reschedule().await;
        }
    }

    /// Register a one-shot timer at the next occurrence of `at` in `tz`
    fn arm_at(self: &Arc<Self>, at: NaiveTime, tz: Tz, label: String, action: TimerAction) -> Option<u64> {
        let expr = daily_cron_expr(at);
        let cron_schedule = match cron::Schedule::from_str(&expr) {
            Ok(schedule) => schedule,
            Err(e) => {
                error!("Invalid cron expression '{}' for {}: {}", expr, label, e);
                return None;
            }
        };
        let next_time = match cron_schedule.upcoming(tz).next() {
            Some(t) => t,
            None => {
                warn!("No upcoming fire time for {} with cron '{}'", label, expr);
                return None;
            }
        };
        let wait = (next_time.with_timezone(&Utc) - Utc::now())
            .to_std()
            .unwrap_or_default();

        let id = self.next_timer_id.fetch_add(1, Ordering::Relaxed);
        let manager = Arc::clone(self);
        let handle = tokio::spawn(async move {
            sleep(wait).await;
            // One-shot: drop the table entry before acting, so the midnight
            // rollover never aborts the task that is running it
            manager.timers.remove(&id);
            manager.fire(action).await;
        });
        self.timers.insert(id, ArmedTimer { label, handle });
        Some(id)
    }

    async fn fire(self: &Arc<Self>, action: TimerAction) {
        match action {
            TimerAction::ClassEnding { name, location } => {
                info!("Time to send message for {}", name);
                self.notifier.notify_class_ending(&name, &location).await;
            }
            TimerAction::CustomMessage { text } => {
                info!("Sending custom message at its scheduled time");
                self.notifier.send_class_message("Custom", "N/A", Some(text)).await;
            }
            TimerAction::MidnightRollover => {
                info!("New day started, scheduling today's messages...");
                self.reschedule().await;
            }
        }
    }
}
