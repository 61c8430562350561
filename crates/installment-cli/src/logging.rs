use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Default filter when `RUST_LOG` is unset: library warnings only.
const DEFAULT_DIRECTIVE: &str = "installment_core=warn";

/// Initializes the global tracing subscriber, writing to stderr so logs
/// never mix with command output.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let directive = if verbose {
            "installment_core=debug"
        } else {
            DEFAULT_DIRECTIVE
        };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(directive));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}
