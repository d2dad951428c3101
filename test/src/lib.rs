
pub use helpers::*;

/// Initialises logging for a test binary. Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
