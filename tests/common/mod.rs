use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Installs a subscriber once for the integration scenarios. Defaults to
/// warn-level output for this crate; RUST_LOG overrides when set.
pub fn init_test_env() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ladder_processor=warn"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    });
}
