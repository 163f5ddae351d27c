use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logs go to stderr so rendered output and JSON snapshots stay clean on
/// stdout.
pub fn init_cli_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("small_cart=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("small_cart=warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// Best-effort variant for tests; ignores an already installed subscriber.
pub fn try_init_test_logger() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new("small_cart=debug"))
        .with(tracing_subscriber::fmt::layer().with_test_writer().compact())
        .try_init();
}
