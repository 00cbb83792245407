/// Initializes tracing for general application use.
/// The level is read from RUST_LOG (e.g. RUST_LOG=llisp=debug). Logs go to
/// stderr so that program output on stdout stays clean.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Initializes tracing for tests, once per process, at trace level with
/// output captured by the test runner.
#[cfg(test)]
pub fn init_test_logging() {
    static TRACING_INIT: std::sync::Once = std::sync::Once::new();
    TRACING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("trace")
            .with_test_writer()
            .try_init()
            .ok(); // Another test harness may have installed one already
    });
}
