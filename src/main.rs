use std::sync::Arc;

use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use tuns_admission::allocator::AllocationPlan;
use tuns_admission::api;
use tuns_admission::config::{self, ServerConfig};
use tuns_admission::state::AppState;

#[tokio::main]
async fn main() {
    tuns_admission::init_tracing();

    tracing::info!("TunsAdmission starting v{}", config::APP_VERSION);

    let server_config = ServerConfig::from_env();

    let data_dir = config::app_data_dir();
    std::fs::create_dir_all(&data_dir)
        .expect("Failed to create the application data directory");

    let plan = match &server_config.plan_path {
        Some(path) => AllocationPlan::load(path).expect("Failed to load the allocation plan"),
        None => AllocationPlan::bundled().expect("Bundled allocation plan is invalid"),
    };

    let state = Arc::new(AppState::new(config::database_path(), plan));

    // Run migrations before the listener starts
    state
        .open_db()
        .expect("Failed to initialize the admission database");

    let mut server = api::start_server(&server_config, state)
        .await
        .expect("Failed to start the admission server");

    tracing::info!(addr = %server.addr, "Ready for applications");

    shutdown_signal().await;

    server.shutdown();
    server.wait().await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        tracing::info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
