use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reelgraph::{
    api::{create_router, AppState},
    config::Config,
    db::FileWatchlistRepository,
    services::{Catalog, WatchlistStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("reelgraph=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let catalog = Catalog::load(&config.catalog_path).await?;
    let repository = FileWatchlistRepository::new(&config.watchlist_dir);
    let watchlists = WatchlistStore::new(Arc::new(repository));

    // Restore the default user's list before serving
    watchlists.reload(&config.default_user).await?;

    let state = AppState::new(catalog, watchlists);
    tracing::info!(
        movies = state.catalog.len(),
        genres = state.graph.len(),
        "Catalog ready"
    );

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
