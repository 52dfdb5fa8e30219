use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn init_logging() {
    // Load .env first so RUST_LOG and LOG_FORMAT apply to the subscriber.
    dotenv().ok();
    let format = common::utils::logging::init_from_env();
    info!(service = "service-spot", event = "logger_init", ?format, "tracing subscriber initialized");
}

fn main() -> std::process::ExitCode {
    init_logging();

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "service-spot",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    // Optional config.toml, then environment overrides.
    let cfg = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "service-spot", event = "config_invalid", error = %e, "cannot load configuration");
            return std::process::ExitCode::FAILURE;
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
            error!(service = "service-spot", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "service-spot",
        event = "start",
        %service_id,
        pid,
        version,
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "service spot starting"
    );

    rt.block_on(async move {
        let server_task = tokio::spawn(server::run(cfg));
        match server_task.await {
            Ok(Ok(())) => {
                info!(service = "service-spot", event = "stop", %service_id, pid, "server stopped normally");
                std::process::ExitCode::SUCCESS
            }
            Ok(Err(e)) => {
                error!(service = "service-spot", event = "run_failed", error = %e, "server::run returned error");
                std::process::ExitCode::FAILURE
            }
            Err(e) => {
                error!(service = "service-spot", event = "task_join_error", error = %e, "server task join error");
                std::process::ExitCode::FAILURE
            }
        }
    })
}
