use tracing::Level;

/// Installs the global fmt subscriber. Lambda stamps each line itself, so no
/// timestamps are printed.
pub fn init_logger(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .init();
}
