//! # Errores del Servidor
//! src/error.rs
//!
//! Errores a nivel de conexión y de arranque. Los errores propios de cada
//! etapa viven en su módulo ([`ParseError`](crate::http::ParseError),
//! [`FileError`](crate::handlers::FileError)) y se traducen a un código HTTP
//! antes de llegar aquí.
//!
//! Solo [`ServerError::Bind`] es fatal. El resto se registra en el thread de
//! la conexión y no afecta al listener ni a otras conexiones.

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// No se pudo abrir el puerto de escucha
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    /// Falló un accept; el listener sigue aceptando
    #[error("failed to accept connection: {0}")]
    Accept(#[source] io::Error),

    /// El socket falló mientras se leía el request
    #[error("failed to read request: {0}")]
    Read(#[source] io::Error),

    /// No se pudo enviar la respuesta; la conexión se cierra sin reintentar
    #[error("failed to write response: {0}")]
    WriteFailure(#[source] io::Error),
}
