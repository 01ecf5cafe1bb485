pub mod persistence;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

        let directive = "cuenta_core=info"
            .parse()
            .unwrap_or_else(|_| LevelFilter::INFO.into());
        let filter = EnvFilter::from_default_env().add_directive(directive);

        let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
    });
}
