use chrono::{NaiveTime, Timelike};

/// Minutes in a day, the wrap-around modulus for fire times
const MINUTES_PER_DAY: u32 = 1440;

/// Compute the notification fire time: `end - lead_minutes`, borrowing into the
/// hour and wrapping past midnight. Total over hour 0-23, minute 0-59,
/// lead 0-1439.
pub fn fire_time(end: NaiveTime, lead_minutes: u32) -> NaiveTime {
    let end_total = end.hour() * 60 + end.minute();
    let fire_total = (end_total + MINUTES_PER_DAY - lead_minutes % MINUTES_PER_DAY) % MINUTES_PER_DAY;
    NaiveTime::from_hms_opt(fire_total / 60, fire_total % 60, 0)
        .expect("fire time within 0..24h")
}

/// Build a once-a-day cron expression for the given time of day
pub fn daily_cron_expr(time: NaiveTime) -> String {
    format!("0 {} {} * * *", time.minute(), time.hour())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_fire_time_simple_offset() {
        assert_eq!(fire_time(hm(10, 0), 20), hm(9, 40));
        assert_eq!(fire_time(hm(16, 0), 20), hm(15, 40));
    }

    #[test]
    fn test_fire_time_wraps_to_previous_day() {
        assert_eq!(fire_time(hm(0, 10), 20), hm(23, 50));
        assert_eq!(fire_time(hm(0, 0), 1), hm(23, 59));
    }

    #[test]
    fn test_fire_time_zero_lead() {
        assert_eq!(fire_time(hm(13, 30), 0), hm(13, 30));
    }

    #[test]
    fn test_fire_time_minute_borrow() {
        assert_eq!(fire_time(hm(13, 5), 10), hm(12, 55));
    }

    #[test]
    fn test_fire_time_congruence_over_domain_sample() {
        // (fire.hour*60 + fire.minute) == (end - lead) mod 1440 for the whole
        // stated input domain, sampled on a coarse grid
        for hour in 0..24 {
            for minute in (0..60).step_by(7) {
                for lead in (0..1440).step_by(97) {
                    let end = hm(hour, minute);
                    let fire = fire_time(end, lead);
                    let expected = (hour * 60 + minute + 1440 - lead) % 1440;
                    assert_eq!(fire.hour() * 60 + fire.minute(), expected);
                }
            }
        }
    }

    #[test]
    fn test_fire_time_max_lead() {
        // 1439 minutes before 00:00 is 00:01
        assert_eq!(fire_time(hm(0, 0), 1439), hm(0, 1));
    }

    #[test]
    fn test_daily_cron_expr() {
        assert_eq!(daily_cron_expr(hm(9, 40)), "0 40 9 * * *");
        assert_eq!(daily_cron_expr(hm(0, 0)), "0 0 0 * * *");
    }
}
