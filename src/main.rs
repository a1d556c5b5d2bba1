//! # plainhttp - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor HTTP/1.1.

use plainhttp::config::Config;
use plainhttp::logging;
use plainhttp::server::Server;

fn main() {
    if let Err(e) = logging::init() {
        eprintln!("No se pudo inicializar el logging: {}", e);
    }

    // Crear configuración desde CLI / variables de entorno
    let config = Config::new();

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "invalid configuration");
        std::process::exit(2);
    }

    config.print_summary();

    let server = match Server::bind(config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "could not start server");
            std::process::exit(1);
        }
    };

    // Iniciar el servidor (esto bloquea el thread)
    if let Err(e) = server.run() {
        tracing::error!(error = %e, "server stopped");
        std::process::exit(1);
    }
}
