use log::{Level, LevelFilter};

struct DebugLogger;

static LOGGER: DebugLogger = DebugLogger;

impl log::Log for DebugLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        match record.level() {
            Level::Debug => println!("[Debug] {}", record.args()),
            level => eprintln!("[{}] {}", level, record.args()),
        }
    }

    fn flush(&self) {}
}

pub fn init() {
    // Result is ignored since a second call keeps the first logger.
    let _ = log::set_logger(&LOGGER).map(|_| log::set_max_level(LevelFilter::Debug));
}

#[cfg(test)]
mod tests {
    use log::Log;

    use super::*;

    #[test]
    fn trace_is_filtered_out() {
        let trace = log::Metadata::builder().level(Level::Trace).build();
        let debug = log::Metadata::builder().level(Level::Debug).build();

        assert!(!LOGGER.enabled(&trace));
        assert!(LOGGER.enabled(&debug));
    }

    #[test]
    fn init_twice_is_harmless() {
        init();
        init();
        assert_eq!(log::max_level(), LevelFilter::Debug);
    }
}
