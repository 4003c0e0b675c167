use std::sync::Once;

/// Initialize the global tracing subscriber once (used by tests that run with `RUST_LOG`).
///
/// Output goes to the test writer so it is captured per test unless
/// `--nocapture` is passed.
pub fn init_tracing_from_env() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(type_picker::services::tracing_setup::env_filter())
            .with_test_writer();
        let _ = subscriber.try_init();
    });
}
