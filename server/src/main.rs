use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = todo_server::Config::from_env()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(
        app = %config.app_name,
        version = %config.app_version,
        environment = %config.environment,
        "listening on http://{addr}"
    );
    tracing::debug!(database = %config.redacted_database_url(), "relational backend not enabled");

    todo_server::run(listener, config).await?;
    Ok(())
}
