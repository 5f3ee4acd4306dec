use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use vectura::config::Config;
use vectura::engine::Engine;
use vectura::server::serve;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().unwrap();

    let engine = Arc::new(Engine::new(&config).unwrap());

    Engine::spawn_sweeper(&engine, config.session_sweep_interval);

    serve(engine, config.listen_addr).await;
}
