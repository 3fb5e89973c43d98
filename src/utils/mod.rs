use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Installs the global tracing subscriber once per process. `RUST_LOG` replaces
/// the default filter.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("budget_manager=info"));

        let installed = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok();
        if installed {
            tracing::info!("Budget Manager tracing initialized.");
        }
    });
}
