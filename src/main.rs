use search_gateway::app::build_router;
use search_gateway::cache::result_cache::ResultCache;
use search_gateway::config::Config;
use search_gateway::engine::client::SearchEngine;
use search_gateway::engine::elastic::ElasticClient;
use search_gateway::indexing::writer::IndexWriter;
use search_gateway::search::service::SearchService;
use search_gateway::search::types::IndexNames;
use search_gateway::storage::memory::MemoryStore;
use search_gateway::storage::store::KeyValueStore;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = Config::from_env()?;
    let args: Vec<String> = std::env::args().collect();
    config.apply_args(&args)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(!config.is_production())
        .init();

    tracing::info!(
        "Starting search gateway ({}) on {}",
        config.environment,
        config.bind_addr
    );

    // 1. Engine client:
    let engine = ElasticClient::new(&config.elasticsearch_url, config.engine_timeout)?;
    tracing::info!("Search engine at {}", engine.base_url());
    if let Err(e) = engine.ping().await {
        tracing::warn!("Search engine not reachable yet: {}", e);
    }
    let engine: Arc<dyn SearchEngine> = Arc::new(engine);

    // 2. Cache store:
    let memory = Arc::new(MemoryStore::new());
    memory.clone().spawn_sweeper(config.cache_sweep_interval);
    let store: Arc<dyn KeyValueStore> = memory;
    let cache = ResultCache::new(store, config.cache_ttl, config.cache_timeout);
    tracing::info!("Result cache TTL {:?}", cache.ttl());

    // 3. Services:
    let indices = IndexNames::new(&config.index_prefix);
    tracing::info!("Entity indices: {}", indices.all_pattern());

    let service = Arc::new(SearchService::new(
        engine.clone(),
        cache.clone(),
        indices.clone(),
    ));
    let writer = Arc::new(IndexWriter::new(engine, cache, indices));

    // 4. HTTP Router:
    let app = build_router(service, writer);

    // 5. Start HTTP server:
    tracing::info!("HTTP server listening on {}", config.bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
