pub(crate) fn init_tracing() {
    // Logs go to stderr; stdout carries only the transaction identifier.
    if tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .is_err()
    {
        // Tracing was already initialized by an embedding host.
    }
}
