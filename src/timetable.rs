use std::collections::HashMap;
use std::str::FromStr;

use chrono::{NaiveTime, Weekday};

use crate::error::InvalidInput;

/// A single class session with its end time and room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassEntry {
    pub name: String,
    pub end_time: NaiveTime,
    pub location: String,
}

impl ClassEntry {
    /// Build an entry from an `"HH:MM"` end time string
    pub fn new(name: &str, end_time: &str, location: &str) -> Result<Self, InvalidInput> {
        Ok(Self {
            name: name.to_string(),
            end_time: parse_end_time(end_time)?,
            location: location.to_string(),
        })
    }
}

/// Parse an end time in HH:MM format
pub fn parse_end_time(time_str: &str) -> Result<NaiveTime, InvalidInput> {
    NaiveTime::parse_from_str(time_str, "%H:%M")
        .map_err(|_| InvalidInput::BadTime(time_str.to_string()))
}

/// Parse a weekday name ("Monday", "mon", case-insensitive)
pub fn parse_weekday(day: &str) -> Result<Weekday, InvalidInput> {
    Weekday::from_str(day).map_err(|_| InvalidInput::UnknownDay(day.to_string()))
}

/// Full weekday name for logs and responses
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Weekly class timetable, keyed by weekday.
/// Entry order within a day is preserved for logging and display only.
#[derive(Debug, Clone)]
pub struct Timetable {
    days: HashMap<Weekday, Vec<ClassEntry>>,
}

impl Timetable {
    /// A timetable with no classes on any day
    #[cfg(test)]
    pub fn empty() -> Self {
        Self {
            days: HashMap::new(),
        }
    }

    /// The classes for a day; `None` when nothing is scheduled
    pub fn entries_for(&self, day: Weekday) -> Option<&[ClassEntry]> {
        self.days.get(&day).map(|entries| entries.as_slice())
    }

    /// Replace a day's class list wholesale
    pub fn set_day(&mut self, day: Weekday, entries: Vec<ClassEntry>) {
        self.days.insert(day, entries);
    }
}

impl Default for Timetable {
    fn default() -> Self {
        let entry = |name, end_time, location| {
            ClassEntry::new(name, end_time, location).expect("valid seed entry")
        };

        let mut days = HashMap::new();
        days.insert(
            Weekday::Mon,
            vec![
                entry("ADS", "10:00", "TG-421 (Gaganpreet)"),
                entry("CC", "13:00", "TG-421 (Righa)"),
                entry("Information Systems", "16:00", "TG-421 (Sati)"),
            ],
        );
        days.insert(
            Weekday::Tue,
            vec![
                entry("ADS", "10:00", "TG-421 (Gaganpreet)"),
                entry("Information Systems", "13:00", "TG-421 (Sati)"),
                entry("Network Security", "16:00", "TG-421 (Shivani)"),
            ],
        );
        days.insert(
            Weekday::Wed,
            vec![
                entry("ADS", "10:00", "TG-421 (Gaganpreet)"),
                entry("Information Systems", "13:00", "TG-421 (Sati)"),
                entry("Network Security", "16:00", "TG-421 (Shivani)"),
            ],
        );
        days.insert(
            Weekday::Thu,
            vec![
                entry("CISCO", "10:00", "TG-421 (T-30)"),
                entry("CC", "13:00", "TG-421 (Righa)"),
                entry("VM", "16:00", "TG-421 (Gaganpreet/T-14)"),
            ],
        );
        days.insert(
            Weekday::Fri,
            vec![
                entry("CISCO", "10:00", "TG-421 (T-30)"),
                entry("CC", "13:00", "TG-421 (Righa)"),
                entry("VM", "16:00", "TG-421 (Gaganpreet/T-14)"),
            ],
        );

        Self { days }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_end_time() {
        assert!(parse_end_time("10:00").is_ok());
        assert!(parse_end_time("23:59").is_ok());
        assert!(parse_end_time("24:00").is_err());
        assert!(parse_end_time("invalid").is_err());
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("Monday"), Ok(Weekday::Mon));
        assert_eq!(parse_weekday("tue"), Ok(Weekday::Tue));
        assert!(parse_weekday("Funday").is_err());
    }

    #[test]
    fn test_weekday_name() {
        assert_eq!(weekday_name(Weekday::Mon), "Monday");
        assert_eq!(weekday_name(Weekday::Sun), "Sunday");
    }

    #[test]
    fn test_default_timetable_week() {
        let timetable = Timetable::default();
        assert_eq!(timetable.entries_for(Weekday::Mon).unwrap().len(), 3);
        assert_eq!(timetable.entries_for(Weekday::Fri).unwrap().len(), 3);
        assert!(timetable.entries_for(Weekday::Sat).is_none());
        assert!(timetable.entries_for(Weekday::Sun).is_none());
    }

    #[test]
    fn test_set_day_replaces_entries() {
        let mut timetable = Timetable::default();
        let entries = vec![ClassEntry::new("Maths", "09:30", "B-101").unwrap()];
        timetable.set_day(Weekday::Mon, entries.clone());
        assert_eq!(timetable.entries_for(Weekday::Mon).unwrap(), &entries[..]);
    }

    #[test]
    fn test_set_day_on_empty_timetable() {
        let mut timetable = Timetable::empty();
        assert!(timetable.entries_for(Weekday::Mon).is_none());
        timetable.set_day(Weekday::Mon, vec![]);
        assert_eq!(timetable.entries_for(Weekday::Mon), Some(&[][..]));
    }
}
