//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones entrantes, cada una en su propio thread
//! 3. Lee y parsea exactamente un request por conexión
//! 4. Envía la response (comprimida si el cliente acepta gzip) y cierra

pub mod tcp;

// Re-exportar para facilitar el uso
pub use tcp::{handle_connection, Server};
