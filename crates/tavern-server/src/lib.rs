//! Tavern admin server
//!
//! Thin HTTP surface over the cache manager: listing, detail lookup and
//! glob-targeted bulk write/evict. All cache semantics live in the
//! infrastructure and domain layers; handlers only translate between
//! HTTP and the manager's request types.

pub mod admin;

use std::path::Path;
use tavern_infrastructure::bootstrap::build_context;
use tavern_infrastructure::config::ConfigLoader;
use tavern_infrastructure::logging::init_logging;

use admin::handlers::AdminState;
use admin::routes::admin_router;

/// Load configuration, assemble the application context and serve the
/// admin API until shutdown.
pub async fn run(config_path: Option<&Path>) -> anyhow::Result<()> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = config_path {
        loader = loader.with_config_path(path);
    }
    let config = loader.load()?;
    init_logging(&config.logging)?;

    let context = build_context(config)?;
    let state = AdminState {
        manager: context.manager.clone(),
    };

    let address = format!(
        "{}:{}",
        context.config.server.host, context.config.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, caches = context.manager.registry().len(), "admin api listening");

    axum::serve(listener, admin_router(state)).await?;
    Ok(())
}
