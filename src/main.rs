use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use titan_image_generator::{
    bedrock::TitanImageGenerator, config::Config, handler::Handler, storage::StorageBackends, web,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let generator = Arc::new(TitanImageGenerator::from_config(&config).await);
    let backends = StorageBackends::from_config(&config).await?;
    let handler = Arc::new(Handler::new(generator, backends.blobs, backends.records));
    let router = web::router(handler, backends.local_blob_dir);

    let bind_address = config.bind_address();
    let tcp_listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Image generation server started at http://{}", bind_address);

    axum::serve(tcp_listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
