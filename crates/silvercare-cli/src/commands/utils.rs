use anyhow::{Context, Result};
use chrono::Local;
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

use silvercare_core::chat::{Message, MessageRole};
use silvercare_core::notification::{Alert, AlertKind};
use silvercare_core::time::{format_date, format_time};

/// Logs to stderr. `RUST_LOG` wins unless `--verbose` is given; default is `warn`.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

pub fn alert_marker(kind: AlertKind) -> &'static str {
    match kind {
        AlertKind::Info => "[정보]",
        AlertKind::Warning => "[주의]",
        AlertKind::Emergency => "[응급]",
        AlertKind::Reminder => "[알림]",
    }
}

pub fn format_alert(alert: &Alert) -> String {
    let unread = if alert.read { " " } else { "*" };
    let action = if alert.action_required {
        " (조치 필요)"
    } else {
        ""
    };
    format!(
        "{}{} {} {}{}\n    {}\n    id: {}",
        unread,
        alert_marker(alert.kind),
        format_time(&alert.timestamp, &Local),
        alert.title,
        action,
        alert.message.replace('\n', "\n    "),
        alert.id
    )
}

pub fn format_message(message: &Message) -> String {
    let speaker = match message.role {
        MessageRole::User => "나",
        MessageRole::Assistant => "실버메이트",
    };
    format!(
        "[{}] {}: {}",
        format_time(&message.timestamp, &Local),
        speaker,
        message.content
    )
}

pub fn today_heading() -> String {
    format_date(&chrono::Utc::now(), &Local)
}

/// Prints `question` and reads one line. `None` on end of input.
pub fn prompt_line(question: &str) -> Result<Option<String>> {
    print!("{}", question);
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Asks a yes/no question; anything but `y`/`yes`/`예` is no.
pub fn confirm(question: &str) -> Result<bool> {
    let answer = prompt_line(&format!("{} [y/N] ", question))?;
    Ok(matches!(
        answer.as_deref().map(str::to_lowercase).as_deref(),
        Some("y") | Some("yes") | Some("예")
    ))
}
