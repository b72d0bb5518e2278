use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Console logger for the CLI. `RUST_LOG` wins when set; otherwise
/// `verbose` picks between info and debug for this crate.
pub fn init(verbose: bool) {
    let default_filter = if verbose { "qfx2csv=debug,info" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .compact(),
        )
        .init();
}
