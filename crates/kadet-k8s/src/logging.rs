use tracing_subscriber::{
    EnvFilter, Registry, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Initializes `tracing` logging with options from the environment variable
/// given in the `env` parameter.
///
/// We force users to provide a variable name so it can be different per tool,
/// e.g. `K8SDET_LOG`. If the variable is unset or invalid, the maximum log level
/// is set to INFO.
///
/// Logs are written to stderr, stdout is reserved for the rendered manifests.
pub fn initialize_logging(env: &str, app_name: &str) {
    let filter = EnvFilter::try_from_env(env)
        .unwrap_or_else(|_| EnvFilter::default().add_directive(LevelFilter::INFO.into()));

    let fmt = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    Registry::default().with(filter).with(fmt).init();

    tracing::debug!(app_name, env, "logging initialized");
}
