pub mod chat;
pub mod memories;
pub mod models;
pub mod search;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use memchat::config::MemchatConfig;

/// Start a stderr spinner with `message`. Call `finish_and_clear` when done.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// The user from the command line, falling back to the configured one.
pub fn resolve_user<'a>(config: &'a MemchatConfig, user: Option<&'a str>) -> &'a str {
    user.unwrap_or(&config.session.user_id)
}

/// Truncate `text` to at most `max` characters, adding `...` when cut.
pub fn preview(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}
