use {
    base::logging::{StdoutLogger, level_from_env},
    log::{Level, LevelFilter, Log, Metadata, Record},
    std::sync::Mutex,
};

struct Capture(Mutex<Vec<(Level, String)>>);

impl Log for Capture {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.0
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture(Mutex::new(Vec::new()));

// The process logger can be installed once, so one test owns it.
#[test]
fn test_max_level_filters_records() {
    log::set_logger(&CAPTURE).unwrap();

    log::set_max_level(LevelFilter::Debug);
    log::debug!("stage {}", "validating");
    log::info!("done in {}ms", 12);

    log::set_max_level(LevelFilter::Warn);
    log::info!("suppressed");
    log::warn!("cache full");

    let lines = CAPTURE.0.lock().unwrap();
    assert_eq!(
        *lines,
        vec![
            (Level::Debug, "stage validating".to_string()),
            (Level::Info, "done in 12ms".to_string()),
            (Level::Warn, "cache full".to_string()),
        ]
    );
}

#[test]
fn test_level_from_env_unset() {
    assert_eq!(level_from_env("TRYON_LOG_UNSET_IN_TESTS"), None);
}

#[test]
fn test_stdout_logger_accepts_records() {
    let logger = StdoutLogger;
    let metadata = Metadata::builder().level(Level::Info).build();
    assert!(logger.enabled(&metadata));
    logger.log(
        &Record::builder()
            .level(Level::Info)
            .file(Some("logging_tests.rs"))
            .line(Some(1))
            .args(format_args!("hello"))
            .build(),
    );
    logger.flush();
}
