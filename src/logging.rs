use std::fs::{create_dir_all, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::Local;
use colored::*;
use indicatif::ProgressBar;

use crate::error::AacResult;

lazy_static::lazy_static! {
    static ref LOG_FILE: Mutex<Option<PathBuf>> = Mutex::new(None);
    static ref ECHO_BAR: Mutex<Option<ProgressBar>> = Mutex::new(None);
}

static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn init_logging(verbose: bool) -> AacResult<PathBuf> {
    VERBOSE.store(verbose, Ordering::Relaxed);

    let log_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("gh-aac")
        .join("logs");

    create_dir_all(&log_dir)?;

    let log_file = log_dir.join(format!("gh-aac-{}.log", Local::now().format("%Y%m%d-%H%M%S")));

    if let Ok(mut target) = LOG_FILE.lock() {
        *target = Some(log_file.clone());
    }

    log_debug(&format!("Logging initialized to: {}", log_file.display()));

    Ok(log_file)
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

pub fn log_error(message: &str) {
    log_with_level("ERROR", message);
}

pub fn log_warn(message: &str) {
    log_with_level("WARN", message);
}

pub fn log_info(message: &str) {
    log_with_level("INFO", message);
}

pub fn log_debug(message: &str) {
    log_with_level("DEBUG", message);
}

/// Log an error to the file only, for failures reported elsewhere on screen.
pub fn log_error_to_file(message: &str) {
    write_to_file("ERROR", message);
}

/// Draw stderr echoes above `bar` while it is shown. `None` goes back to
/// plain stderr.
pub fn echo_above(bar: Option<ProgressBar>) {
    if let Ok(mut target) = ECHO_BAR.lock() {
        *target = bar;
    }
}

pub fn log_panic_info(info: &std::panic::PanicHookInfo) {
    let mut message = String::from("PANIC: ");

    if let Some(location) = info.location() {
        message.push_str(&format!(
            "at {}:{}:{} - ",
            location.file(),
            location.line(),
            location.column()
        ));
    }

    if let Some(s) = info.payload().downcast_ref::<&str>() {
        message.push_str(s);
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        message.push_str(s);
    } else {
        message.push_str("Unknown panic payload");
    }

    log_error(&message);

    let backtrace = std::backtrace::Backtrace::capture();
    log_debug(&format!("Backtrace:\n{}", backtrace));
}

/// Route panics to the log file before the default hook prints them.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        log_panic_info(info);
        default_hook(info);
    }));
}

fn echo_tag(level: &str, verbose: bool) -> Option<ColoredString> {
    match level {
        "ERROR" => Some(level.red().bold()),
        "WARN" => Some(level.yellow().bold()),
        "INFO" if verbose => Some(level.cyan()),
        "DEBUG" if verbose => Some(level.dimmed()),
        _ => None,
    }
}

fn echo(level: &str, message: &str) {
    let Some(tag) = echo_tag(level, is_verbose()) else {
        return;
    };
    let line = format!("{} {}", tag, message);

    match ECHO_BAR.lock().ok().and_then(|guard| guard.clone()) {
        Some(bar) => bar.suspend(|| eprintln!("{}", line)),
        None => eprintln!("{}", line),
    }
}

fn write_to_file(level: &str, message: &str) {
    let target = LOG_FILE.lock().ok().and_then(|guard| guard.clone());
    if let Some(log_file) = target {
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(log_file) {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            let _ = writeln!(file, "[{}] {} - {}", timestamp, level, message);
        }
    }
}

fn log_with_level(level: &str, message: &str) {
    write_to_file(level, message);
    echo(level, message);
}

pub fn get_log_file_path() -> Option<PathBuf> {
    LOG_FILE.lock().ok().and_then(|guard| guard.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_runs_echo_only_warnings_and_errors() {
        assert!(echo_tag("ERROR", false).is_some());
        assert!(echo_tag("WARN", false).is_some());
        assert!(echo_tag("INFO", false).is_none());
        assert!(echo_tag("DEBUG", false).is_none());
    }

    #[test]
    fn verbose_runs_echo_every_level() {
        for level in ["ERROR", "WARN", "INFO", "DEBUG"] {
            assert!(echo_tag(level, true).is_some(), "{} not echoed", level);
        }
    }

    #[test]
    fn echoes_draw_above_a_registered_bar() {
        let bar = ProgressBar::hidden();
        echo_above(Some(bar.clone()));
        log_warn("printed while a bar is shown");
        echo_above(None);

        assert!(ECHO_BAR.lock().unwrap().is_none());
    }
}
