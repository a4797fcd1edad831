use env_logger::Env;
use indicatif::MultiProgress;
use log::{Log, Metadata, Record, SetLoggerError};

/// env_logger output that hides the progress bars while a line is written,
/// so log lines and bars never share a terminal row
pub struct BarAwareLogger {
    inner: env_logger::Logger,
    multi: MultiProgress,
}

impl BarAwareLogger {
    pub fn new(inner: env_logger::Logger, multi: MultiProgress) -> Self {
        Self { inner, multi }
    }
}

impl Log for BarAwareLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if self.inner.matches(record) {
            self.multi.suspend(|| self.inner.log(record));
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Install the global logger (`RUST_LOG`, default `info`) in front of `multi`
pub fn init_logging(multi: &MultiProgress) -> Result<(), SetLoggerError> {
    let inner = env_logger::Builder::from_env(Env::default().default_filter_or("info")).build();
    let max_level = inner.filter();

    log::set_boxed_logger(Box::new(BarAwareLogger::new(inner, multi.clone())))?;
    log::set_max_level(max_level);
    Ok(())
}
