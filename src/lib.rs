//! # plainhttp
//! src/lib.rs
//!
//! Servidor HTTP/1.1 mínimo implementado sobre `std::net`: un request por
//! conexión, un thread por conexión.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: parsing del request, construcción de la response y gzip
//! - `router`: enrutamiento de (método, path) a handlers
//! - `handlers`: echo, user-agent, raíz, lectura/escritura de archivos y 404
//! - `server`: listener TCP y manejo de conexiones
//! - `config`: argumentos CLI y variables de entorno
//! - `error`: errores de arranque y de conexión
//! - `logging`: inicialización de `tracing`
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use plainhttp::config::Config;
//! use plainhttp::server::Server;
//!
//! let config = Config::default();
//! let server = Server::bind(config).expect("Error al abrir el puerto");
//! server.run().expect("Error en el servidor");
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod logging;
pub mod router;
pub mod server;
