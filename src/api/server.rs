//! Admission server lifecycle.
//!
//! Binds the configured address, mounts `admission_router()`, and
//! runs axum in a background tokio task. The returned handle carries
//! the bound address and a shutdown channel.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::api::router::admission_router;
use crate::auth::AdminCredential;
use crate::config::ServerConfig;
use crate::state::AppState;

/// Handle to a running admission server.
pub struct AdmissionServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: tokio::task::JoinHandle<()>,
}

impl AdmissionServer {
    /// Shut down the server gracefully.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Admission server shutdown signal sent");
        }
    }

    /// Wait for the server task to finish draining requests.
    pub async fn wait(self) {
        let _ = self.task.await;
    }
}

/// Start the admission server.
///
/// Derives the staff credential, builds the router, and spawns the
/// axum server in a background task. Connect info is threaded through
/// so the login endpoint can track failing addresses.
pub async fn start_server(
    config: &ServerConfig,
    state: Arc<AppState>,
) -> Result<AdmissionServer, String> {
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .map_err(|e| format!("Failed to bind {}: {e}", config.bind_addr))?;

    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get server address: {e}"))?;

    tracing::info!(%addr, "Admission server binding");

    let credential = AdminCredential::derive(&config.admin_passphrase);
    let app = admission_router(state, credential, &config.static_dir);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Admission server received shutdown signal");
        };

        tracing::info!(%addr, "Admission server started");

        if let Err(e) = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal)
        .await
        {
            tracing::error!("Admission server error: {e}");
        }

        tracing::info!("Admission server stopped");
    });

    Ok(AdmissionServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::allocator::AllocationPlan;
    use crate::models::samples;

    fn test_config(static_dir: &std::path::Path) -> ServerConfig {
        ServerConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            admin_passphrase: "server-test-passphrase".to_string(),
            plan_path: None,
            static_dir: static_dir.to_path_buf(),
        }
    }

    fn test_state(dir: &std::path::Path) -> Arc<AppState> {
        let plan = AllocationPlan::bundled().unwrap();
        Arc::new(AppState::new(dir.join("admission.db"), plan))
    }

    #[tokio::test]
    async fn start_serves_health_and_stops() {
        let tmp = tempfile::tempdir().unwrap();
        let mut server = start_server(&test_config(tmp.path()), test_state(tmp.path()))
            .await
            .expect("server should start");

        assert!(server.addr.port() > 0);

        let url = format!("http://{}/api/health", server.addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), 200);
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["status"], "ok");

        server.shutdown();
        server.wait().await;
    }

    #[tokio::test]
    async fn submit_and_lookup_over_http() {
        let tmp = tempfile::tempdir().unwrap();
        let mut server = start_server(&test_config(tmp.path()), test_state(tmp.path()))
            .await
            .expect("server should start");

        let client = reqwest::Client::new();

        let resp = client
            .post(format!("http://{}/api/applications", server.addr))
            .json(&samples::draft("1234567890123"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let record: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(record["seating"]["exam_id"], "M1-00001");

        let resp = client
            .get(format!("http://{}/api/lookup/00001", server.addr))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);

        server.shutdown();
    }
}
