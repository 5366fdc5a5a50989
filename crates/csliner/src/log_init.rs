use crossterm::style::{Color, Stylize};
use log::{Level, LevelFilter, Metadata, Record};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const LOG_DIR: &str = "csliner-log";
pub const LOG_FILE: &str = "csliner.log";

const TARGETS: [&str; 2] = ["csliner", "ucss"];

struct CslinerLogger {
    file_path: PathBuf,
    level: LevelFilter,
}

impl CslinerLogger {
    fn color(level: Level) -> Color {
        match level {
            Level::Error => Color::Red,
            Level::Warn => Color::Yellow,
            Level::Info => Color::Green,
            Level::Debug => Color::Blue,
            Level::Trace => Color::DarkGrey,
        }
    }
}

impl log::Log for CslinerLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
            && TARGETS.iter().any(|t| metadata.target().starts_with(t))
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = record.level();
        eprintln!(
            "[{}] {}",
            level.as_str().with(Self::color(level)),
            record.args()
        );
        if let Ok(mut file) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
        {
            let _ = writeln!(file, "[{}] {}", level, record.args());
        }
    }

    fn flush(&self) {}
}

/// Logs to stderr and appends to `<root>/csliner-log/csliner.log`.
pub fn init_logger(root: &Path, verbose: bool) {
    let dir = root.join(LOG_DIR);
    let _ = fs::create_dir_all(&dir);
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let logger = CslinerLogger {
        file_path: dir.join(LOG_FILE),
        level,
    };
    // a second call keeps the first logger
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(level);
    }
}
