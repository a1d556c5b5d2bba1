//! # Handlers del Servidor
//!
//! Un handler por familia de rutas. Cada uno recibe el Request y el
//! [`Context`](crate::router::Context) de la ruta y retorna una Response;
//! ningún error de un request termina el proceso, todos se traducen a un
//! código HTTP.
//!
//! - **basic**: raíz, echo, user-agent y 404
//! - **files**: lectura y escritura de archivos bajo el directorio raíz

pub mod basic;
pub mod files;

pub use basic::{echo_handler, not_found_handler, root_handler, user_agent_handler};
pub use files::{file_get_handler, file_post_handler, FileError};
