/// Class-ending schedule modules
mod manager;
mod offset;

// Re-export public types and functions
pub use manager::{ScheduleManager, TimeInfo};
