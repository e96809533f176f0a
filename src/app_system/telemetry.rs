/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` and defaults to `info`:
///
/// ```text
/// RUST_LOG=debug cargo run                      # every request and write
/// RUST_LOG=stock_keeper::actor_framework=debug  # persistence only
/// ```
///
/// Safe to call more than once; later calls are ignored.
pub fn setup_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .compact()
        .try_init();
}
