//! # Pool HTTP Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor: lee la configuración, registra las rutas
//! de ejemplo y corre el acceptor hasta que el proceso termine.

use pool_http::commands::{echo_handler, stats_handler, test_handler};
use pool_http::config::Config;
use pool_http::error::ServerError;
use pool_http::server::Server;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Crear configuración (CLI o variables de entorno)
    let config = Config::new();
    if let Err(e) = config.validate() {
        log::error!("configuración inválida: {}", e);
        std::process::exit(1);
    }
    config.print_summary();

    if let Err(e) = run(config) {
        log::error!("error fatal: {}", e);
        std::process::exit(1);
    }
}

fn run(config: Config) -> Result<(), ServerError> {
    let mut server = Server::from_config(config)?;
    let stats = server.stats();

    server.add_route("GET", "/test", test_handler)?;
    server.add_route("POST", "/echo", echo_handler)?;
    server.add_route("GET", "/stats", stats_handler(stats))?;

    // Iniciar el servidor (esto bloqueará el thread)
    server.start()?;
    server.destroy();
    Ok(())
}
