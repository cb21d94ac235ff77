//! Streamable HTTP transport, for agents that attach to an already running
//! facade instead of launching their own over stdio.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager};
use tokio::net::TcpListener;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::bridge::ReportBridge;
use crate::config::HttpServerConfig;
use crate::server::activity::ReportActivity;
use crate::server::core::ReportsMcpCore;
use crate::server::log_payload::McpLogEntry;

/// Route the MCP endpoint is mounted on.
pub const MCP_HTTP_PATH: &str = "/mcp";

/// A bound, not yet serving, HTTP endpoint for the report tools.
///
/// Binding happens up front so callers can learn the actual port before any
/// agent connects. Every session shares one [`ReportActivity`] ledger.
pub struct ReportsHttpServer {
    listener: TcpListener,
    bridge: Arc<ReportBridge>,
    activity: Arc<ReportActivity>,
    log_sender: Option<UnboundedSender<McpLogEntry>>,
}

impl ReportsHttpServer {
    /// Bind the configured loopback address.
    pub async fn bind(bridge: Arc<ReportBridge>, config: &HttpServerConfig) -> Result<Self> {
        let listener = TcpListener::bind(config.bind_address)
            .await
            .with_context(|| format!("failed to bind MCP HTTP listener on {}", config.bind_address))?;
        Ok(Self {
            listener,
            bridge,
            activity: Arc::new(ReportActivity::default()),
            log_sender: None,
        })
    }

    pub fn with_log_sender(mut self, log_sender: UnboundedSender<McpLogEntry>) -> Self {
        self.log_sender = Some(log_sender);
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr().context("failed to read MCP HTTP listener address")
    }

    pub fn activity(&self) -> Arc<ReportActivity> {
        Arc::clone(&self.activity)
    }

    /// Serve until `shutdown` resolves, then close every session and log the
    /// per-report activity of this run.
    pub async fn serve_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let address = self.local_addr()?;
        let Self {
            listener,
            bridge,
            activity,
            log_sender,
        } = self;

        let sessions = CancellationToken::new();
        let factory_activity = Arc::clone(&activity);
        let service: StreamableHttpService<ReportsMcpCore, LocalSessionManager> = StreamableHttpService::new(
            move || Ok(ReportsMcpCore::new(Arc::clone(&bridge), log_sender.clone()).with_activity(Arc::clone(&factory_activity))),
            Arc::new(LocalSessionManager::default()),
            StreamableHttpServerConfig {
                cancellation_token: sessions.child_token(),
                ..Default::default()
            },
        );
        let router = Router::new().nest_service(MCP_HTTP_PATH, service);

        info!(%address, path = MCP_HTTP_PATH, "serving report tools over HTTP");
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown.await;
                sessions.cancel();
            })
            .await
            .context("MCP HTTP server failed")?;

        info!(%address, "MCP HTTP server stopped");
        activity.log_summary();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingEngine;
    use ktl_reports_registry::ReportCatalog;

    fn bridge() -> (tempfile::TempDir, Arc<ReportBridge>) {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let bridge = ReportBridge::new(ReportCatalog::new(temp_dir.path(), "mcp-"), Arc::new(RecordingEngine::default()));
        (temp_dir, Arc::new(bridge))
    }

    #[tokio::test]
    async fn binds_an_ephemeral_loopback_port() {
        let (_temp_dir, bridge) = bridge();
        let server = ReportsHttpServer::bind(bridge, &HttpServerConfig::default()).await.expect("bind");
        let address = server.local_addr().expect("address");
        assert!(address.ip().is_loopback());
        assert_ne!(address.port(), 0);
    }

    #[tokio::test]
    async fn occupied_port_fails_to_bind() {
        let (_temp_dir, bridge) = bridge();
        let first = ReportsHttpServer::bind(Arc::clone(&bridge), &HttpServerConfig::default()).await.expect("bind");
        let taken = HttpServerConfig {
            bind_address: first.local_addr().expect("address"),
        };
        assert!(ReportsHttpServer::bind(bridge, &taken).await.is_err());
    }

    #[tokio::test]
    async fn serve_returns_once_shutdown_resolves() {
        let (_temp_dir, bridge) = bridge();
        let server = ReportsHttpServer::bind(bridge, &HttpServerConfig::default()).await.expect("bind");
        let activity = server.activity();

        let (stop, stopped) = tokio::sync::oneshot::channel::<()>();
        let serving = tokio::spawn(server.serve_until(async move {
            let _ = stopped.await;
        }));
        let _ = stop.send(());

        serving.await.expect("join").expect("serve");
        assert!(activity.snapshot().is_empty());
    }
}
