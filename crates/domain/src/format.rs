//! Display formatting for snapshot values.

use chrono::NaiveTime;

/// Format a device uptime in milliseconds as the two most significant units.
///
/// ```
/// use feederdash_domain::format::format_uptime;
///
/// assert_eq!(format_uptime(90_000), "1m 30s");
/// assert_eq!(format_uptime(3_700_000), "1h 1m");
/// assert_eq!(format_uptime(90_000_000), "1d 1h");
/// assert_eq!(format_uptime(500), "0s");
/// ```
#[must_use]
pub fn format_uptime(millis: u64) -> String {
    let seconds = millis / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{days}d {}h", hours % 24)
    } else if hours > 0 {
        format!("{hours}h {}m", minutes % 60)
    } else if minutes > 0 {
        format!("{minutes}m {}s", seconds % 60)
    } else {
        format!("{seconds}s")
    }
}

/// Free heap in kibibytes with one decimal, e.g. `"200.0 KB"`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_free_heap(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

/// Progress label with one decimal, e.g. `"72.5%"`.
#[must_use]
pub fn format_progress(percent: f64) -> String {
    format!("{percent:.1}%")
}

/// Progress bar width as a CSS length, e.g. `"72.5%"`.
#[must_use]
pub fn progress_width(percent: f64) -> String {
    format!("{percent}%")
}

#[must_use]
pub fn format_temperature(celsius: f64) -> String {
    format!("{celsius:.1}°C")
}

#[must_use]
pub fn format_humidity(percent: f64) -> String {
    format!("{percent:.1}%")
}

#[must_use]
pub fn presence_label(present: bool) -> &'static str {
    if present { "Detected" } else { "Not detected" }
}

/// `"<today>/<max>"`.
#[must_use]
pub fn format_feedings_today(today: u32, max_per_day: u32) -> String {
    format!("{today}/{max_per_day}")
}

/// Wall-clock label for the last successful update.
#[must_use]
pub fn format_clock(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}
