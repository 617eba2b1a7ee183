// Wall-clock stamps for received snapshots
use chrono::{Local, NaiveTime, Timelike};

/// Local time of receipt as zero-padded `HH:MM:SS`.
pub fn time_of_day() -> String {
    format_time(Local::now().time())
}

fn format_time(time: NaiveTime) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        time.hour(),
        time.minute(),
        time.second()
    )
}
