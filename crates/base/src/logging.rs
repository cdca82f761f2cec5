use {
    anyhow::Result,
    log::{LevelFilter, Log, Metadata, Record},
    std::{
        fs::{File, OpenOptions, create_dir_all},
        io::Write,
        path::PathBuf,
        sync::Mutex,
        time::{SystemTime, UNIX_EPOCH},
    },
};

pub fn format_timestamp() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let days = secs / 86400;
    let time_of_day = secs % 86400;
    let (year, month, day) = civil_from_days(days as i64);
    let hours = time_of_day / 3600;
    let minutes = (time_of_day % 3600) / 60;
    let seconds = time_of_day % 60;
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        year, month, day, hours, minutes, seconds
    )
}

pub fn format_today() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let days = secs / 86400;
    let (year, month, day) = civil_from_days(days as i64);
    format!("{:04}-{:02}-{:02}", year, month, day)
}

// Howard Hinnant's days-to-civil algorithm
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u32;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    (y, m, d)
}

fn format_record(record: &Record) -> String {
    format!(
        "[{:?}:{}:{} - {}:{}] {}",
        std::thread::current().id(),
        record.level(),
        format_timestamp(),
        record.file().unwrap_or("unknown"),
        record.line().unwrap_or(0),
        record.args()
    )
}

pub struct StdoutLogger;

impl Log for StdoutLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        println!("{}", format_record(record));
    }

    fn flush(&self) {
        std::io::stdout().flush().ok();
    }
}

struct FileLoggerState {
    dir: PathBuf,
    current_date: String,
    file: File,
}

/// Appends to `<dir>/<YYYY-MM-DD>.log`, rolling over to a new file at midnight UTC.
pub struct FileLogger {
    state: Mutex<FileLoggerState>,
}

impl FileLogger {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        create_dir_all(&dir)?;
        let current_date = format_today();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(format!("{}.log", current_date)))?;
        Ok(FileLogger {
            state: Mutex::new(FileLoggerState {
                dir,
                current_date,
                file,
            }),
        })
    }
}

impl Log for FileLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let today = format_today();
        if today != state.current_date {
            let new_path = state.dir.join(format!("{}.log", today));
            match OpenOptions::new().create(true).append(true).open(&new_path) {
                Ok(new_file) => {
                    state.file = new_file;
                    state.current_date = today;
                }
                Err(error) => {
                    eprintln!("Failed to open new log file {:?}: {}", new_path, error);
                }
            }
        }
        let line = format_record(record);
        if let Err(error) = writeln!(state.file, "{}", line) {
            eprintln!("Failed to write to log file: {}", error);
            eprintln!("{}", line);
        }
    }

    fn flush(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.file.flush().ok();
    }
}

fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Install `StdoutLogger` as the process logger. Later calls are ignored.
pub fn init_stdout_logger() {
    static LOGGER: StdoutLogger = StdoutLogger;
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(default_level());
    }
}

/// Install a `FileLogger` writing under `dir`. Later calls are ignored, and
/// the logger built by such a call is leaked.
pub fn init_file_logger(dir: impl Into<PathBuf>) -> Result<()> {
    let logger = FileLogger::new(dir)?;
    if log::set_logger(Box::leak(Box::new(logger))).is_ok() {
        log::set_max_level(default_level());
    }
    Ok(())
}

/// Level filter named by `var` (e.g. `TRYON_LOG=info`), if set and valid.
pub fn level_from_env(var: &str) -> Option<LevelFilter> {
    std::env::var(var).ok().and_then(|v| v.trim().parse().ok())
}

/// Apply `level_from_env(var)`. Unset or unparsable values leave the current
/// filter untouched.
pub fn max_level_from_env(var: &str) {
    if let Some(level) = level_from_env(var) {
        log::set_max_level(level);
    }
}

/// Log at error level, flush stdout and exit the process.
#[macro_export]
macro_rules! log_fatal {
    ($($arg:tt)*) => {{
        $crate::log::error!($($arg)*);
        {
            use std::io::Write;
            let _ = std::io::stdout().flush();
        }
        std::process::exit(1);
    }};
}
