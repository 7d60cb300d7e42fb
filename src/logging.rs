// ABOUTME: tracing subscriber setup driven by -v flags and RUST_LOG
// ABOUTME: Logs go to stderr so stdout stays free for the final summary

use tracing_subscriber::EnvFilter;

pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// `RUST_LOG` wins over the verbosity flags when set.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("trello_full_backup={}", level_for(verbosity)))
    });

    // Ignore error if a subscriber is already installed (tests)
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}
