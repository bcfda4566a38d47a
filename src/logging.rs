use std::io::Write;

use log::LevelFilter;

const CRATE_TARGET: &str = "hotspot_picker";

/// Initialise `env_logger`.
///
/// `RUST_LOG` wins when set. Otherwise this crate logs at debug in debug
/// builds and info in release, and other crates only report warnings.
pub fn setup_logger() {
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_env("RUST_LOG");
    } else {
        let level = if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        builder.filter(None, LevelFilter::Warn);
        builder.filter(Some(CRATE_TARGET), level);
    }

    builder.format(|buf, record| {
        let module = record.module_path().unwrap_or("unknown");
        writeln!(
            buf,
            "{} {:<5} {}:{} {}",
            buf.timestamp_millis(),
            record.level(),
            module,
            record.line().unwrap_or(0),
            record.args()
        )
    });

    if let Err(err) = builder.try_init() {
        eprintln!("Logger already initialised: {err}");
    }
}
