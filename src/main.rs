use popular_pages::{
    AnalyticsClient, PopularPagesConfig, PopularPagesError, PopularPagesRequest,
    PopularPagesService,
};
use tower::Service;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), PopularPagesError> {
    // ログ設定 (RUST_LOG で上書き可能)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,popular_pages=debug")),
        )
        .with_writer(std::io::stdout)
        .init();

    let config = PopularPagesConfig::from_env()?;
    let client = AnalyticsClient::from_key_file(&config.key_file_location)?;

    let mut service = PopularPagesService::new(client);
    service.call(PopularPagesRequest::from(&config)).await?;

    Ok(())
}
