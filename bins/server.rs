use std::process::ExitCode;

use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

async fn shutdown_signal(instance_id: Uuid) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(service = "kennel", event = "signal_listen_failed", error = %e, "cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!(service = "kennel", event = "shutdown_signal", %instance_id, "received Ctrl+C, draining connections");
}

fn main() -> ExitCode {
    // .env first so RUST_LOG, LOG_FORMAT and the config fallbacks see it
    dotenv().ok();
    common::utils::logging::init_logging_from_env();

    let instance_id = Uuid::new_v4();
    std::panic::set_hook(Box::new(move |info| {
        error!(service = "kennel", event = "panic", %instance_id, message = %info, "unhandled panic occurred");
    }));

    let cfg = match server::startup::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "kennel", event = "config_invalid", error = %e, "cannot start without a valid config");
            return ExitCode::FAILURE;
        }
    };

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.server.worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "kennel", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "kennel",
        event = "start",
        %instance_id,
        pid = std::process::id(),
        version = env!("CARGO_PKG_VERSION"),
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "kennel server starting"
    );

    match rt.block_on(server::run(cfg, shutdown_signal(instance_id))) {
        Ok(()) => {
            info!(service = "kennel", event = "stop", %instance_id, "server stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "kennel", event = "run_failed", error = %e, "server::run returned error");
            ExitCode::FAILURE
        }
    }
}
