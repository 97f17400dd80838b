//! Plain-text rendering of the view model.

use std::fmt::Write as _;

use feederdash_domain::camera::CameraSource;
use feederdash_domain::config::ConfigForm;
use feederdash_domain::toast::{Toast, ToastKind};
use feederdash_domain::view::DashboardView;

/// ANSI "clear screen, cursor home".
pub const CLEAR: &str = "\x1b[2J\x1b[H";

fn toggle(enabled: bool) -> &'static str {
    if enabled { "ready" } else { "disabled" }
}

fn camera_line(view: &DashboardView) -> String {
    match view.camera.source() {
        CameraSource::Empty => "not loaded".to_string(),
        CameraSource::Stream(url) => format!("stream {url}"),
        CameraSource::Placeholder => "unavailable".to_string(),
        CameraSource::Captured(path) => format!("photo {path}"),
    }
}

/// Render the full dashboard panel.
pub fn panel(view: &DashboardView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Pet feeder  [{}]", view.connection);
    let _ = writeln!(out);
    let _ = writeln!(out, "Feeding");
    let _ = writeln!(out, "  State          {}", view.feeding_state);
    let _ = writeln!(out, "  Compartment    {}", view.compartment);
    let _ = writeln!(out, "  Progress       {}", view.progress_text);
    let _ = writeln!(
        out,
        "  Feed now       {}    Cancel  {}",
        toggle(view.feed_now_enabled),
        toggle(view.cancel_enabled)
    );
    let _ = writeln!(out, "Sensors");
    let _ = writeln!(out, "  Temperature    {}", view.temperature);
    let _ = writeln!(out, "  Humidity       {}", view.humidity);
    let _ = writeln!(out, "  Presence       {}", view.presence);
    let _ = writeln!(out, "Schedule");
    let _ = writeln!(out, "  Next feeding   {}", view.next_feeding);
    let _ = writeln!(out, "  Today          {}", view.feedings_today);
    let _ = writeln!(out, "System");
    let _ = writeln!(out, "  WiFi           {}", view.wifi);
    let _ = writeln!(out, "  Free heap      {}", view.free_heap);
    let _ = writeln!(out, "  Uptime         {}", view.uptime);
    let _ = writeln!(out, "Camera           {}", camera_line(view));
    let _ = write!(out, "Last update      {}", view.last_update);
    out
}

/// One-line toast, e.g. `[ok] Feeding started`.
pub fn toast(toast: &Toast) -> String {
    let tag = match toast.kind {
        ToastKind::Success => "ok",
        ToastKind::Error => "error",
    };
    format!("[{tag}] {}", toast.text)
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

/// Render the config form, grouped the way it is saved.
pub fn config(form: &ConfigForm) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Schedule");
    let _ = writeln!(out, "  Automatic feeding   {}", on_off(form.auto_enabled));
    let _ = writeln!(out, "  Interval (hours)    {}", form.feeding_interval);
    let _ = writeln!(out, "  Portions per day    {}", form.portions_per_day);
    let _ = writeln!(out, "Advanced");
    let _ = writeln!(out, "  Require presence    {}", on_off(form.require_presence));
    let _ = writeln!(out, "  Sound before meal   {}", on_off(form.play_sound));
    let _ = writeln!(out, "  Temperature alerts  {}", on_off(form.temp_alerts));
    let _ = write!(out, "  Humidity alerts     {}", on_off(form.humidity_alerts));
    out
}
