pub mod config;
pub mod controller;
pub mod crd;
pub mod runtime;
pub mod store;
pub mod web;

use tracing_subscriber::{
    EnvFilter, filter::LevelFilter, layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Filter from `spec` (a `RUST_LOG` value); `default_env` applies only when
/// `spec` has no directives.
fn env_filter(default_env: &str, spec: &str) -> EnvFilter {
    let directive = default_env
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into());
    EnvFilter::builder()
        .with_default_directive(directive)
        .parse_lossy(spec)
}

pub fn init_tracing(default_env: &str) {
    let spec = std::env::var("RUST_LOG").unwrap_or_default();
    let filter = env_filter(default_env, &spec);

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .try_init();
}
