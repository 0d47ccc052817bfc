use std::sync::Arc;

mod config;
mod handler;
mod http;
mod logger;
mod routing;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg)?;

    // Worker count only sizes the runtime; sleeping requests never hold a worker
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    // The route table is built here once and shared read-only from now on
    let state = Arc::new(config::AppState::new(&cfg));
    logger::log_server_start(&addr, &cfg, &state.router);

    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    server::start_server_loop(listener, state, signals).await;
    logger::log_info("Server stopped");
    Ok(())
}
