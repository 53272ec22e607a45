use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

/// Logs go to stderr so command output on stdout stays pipeable.
pub fn init_tracing() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = SubscriberBuilder::default()
        .with_max_level(Level::DEBUG)
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
}
