//! Tracing initialization shared by binaries and integration tests.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Defaults to info level for our crates if `RUST_LOG` is not set. Set
/// `FARMACHELO_LOG_JSON=1` for machine-readable output (log shippers);
/// plain text otherwise.
pub fn init() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "farmachelo_storefront=info,farmachelo_admin=info".into());

    let json = std::env::var("FARMACHELO_LOG_JSON").is_ok_and(|v| v == "1");
    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

/// Like [`init`], but safe to call more than once. Used in tests.
pub fn init_for_tests() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
