//! MCP server initialization for stdio and Streamable HTTP transports.
//!
//! Both entry points build one [`Engine`] and share it across every session.

use std::sync::Arc;

use anyhow::Result;
use rmcp::ServiceExt;
use silbenkling::config::SilbenklingConfig;
use silbenkling::engine::Engine;

use crate::tools::KnowledgeTools;

fn setup_engine(config: &SilbenklingConfig) -> Result<Arc<Engine>> {
    let engine = Engine::from_config(config)?;
    if config.storage.backend == "sqlite" {
        tracing::info!(db = %config.resolved_db_path().display(), "database ready");
    }
    Ok(Arc::new(engine))
}

/// Start the MCP server over stdio transport.
pub async fn serve_stdio(config: SilbenklingConfig) -> Result<()> {
    tracing::info!("starting Silbenkling MCP server on stdio");

    let engine = setup_engine(&config)?;
    let tools = KnowledgeTools::new(engine);
    let transport = rmcp::transport::stdio();

    let server = tools.serve(transport).await?;
    tracing::info!("MCP server running, waiting for client");

    server.waiting().await?;
    tracing::info!("MCP server shut down");

    Ok(())
}

/// Start the MCP server over Streamable HTTP transport at `/mcp`.
pub async fn serve_http(config: SilbenklingConfig) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(addr = %bind_addr, "starting Silbenkling MCP server on HTTP");

    let engine = setup_engine(&config)?;

    let service = rmcp::transport::streamable_http_server::StreamableHttpService::new(
        move || Ok(KnowledgeTools::new(Arc::clone(&engine))),
        rmcp::transport::streamable_http_server::session::local::LocalSessionManager::default()
            .into(),
        Default::default(),
    );

    let router = axum::Router::new().nest_service("/mcp", service);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "MCP server listening at http://{bind_addr}/mcp");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}
