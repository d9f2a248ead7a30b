use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

/// Initialize the process-wide logger. RUST_LOG takes precedence over the
/// `--log-level` flag so operators can still scope levels per module.
pub fn init(level: &str) {
    let filter = parse_level(level);

    let mut builder = Builder::new();
    builder
        .filter_level(filter)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                buf.timestamp_seconds(),
                record.level(),
                record.args()
            )
        });
    // init() panics if a logger is already set; tests may init repeatedly
    let _ = builder.try_init();
}

fn parse_level(level: &str) -> LevelFilter {
    match level.to_ascii_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("error"), LevelFilter::Error);
        assert_eq!(parse_level("WARN"), LevelFilter::Warn);
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level("trace"), LevelFilter::Trace);
        assert_eq!(parse_level("info"), LevelFilter::Info);
        assert_eq!(parse_level("bogus"), LevelFilter::Info);
    }

    #[test]
    fn test_init_is_idempotent() {
        init("info");
        init("debug");
    }
}
