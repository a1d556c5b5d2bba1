//! # Módulo HTTP
//!
//! Este módulo implementa el subconjunto de HTTP/1.1 que necesita el
//! servidor, sin librerías de alto nivel. Incluye:
//!
//! - Lectura de requests desde el socket (request line, headers, body)
//! - Construcción y escritura de responses
//! - Negociación y compresión gzip
//! - Códigos de estado
//!
//! ## Alcance
//!
//! - Una petición por conexión: no hay keep-alive
//! - Sin chunked transfer encoding: todo body lleva `Content-Length`
//! - Sin decodificación de `%XX` en el path
//!
//! ### Formato de Request
//!
//! ```text
//! GET /echo/abc HTTP/1.1\r\n
//! Accept-Encoding: gzip\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain\r\n
//! Content-Length: 3\r\n
//! \r\n
//! abc
//! ```

pub mod encoding; // Negociación y compresión gzip
pub mod request; // Lectura de HTTP requests
pub mod response; // Construcción y escritura de HTTP responses
pub mod status; // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
// Esto permite usar `http::Request` en vez de `http::request::Request`
pub use encoding::{accepts_gzip, negotiate, ContentEncoding};
pub use request::{Body, Headers, Method, ParseError, Request, DEFAULT_MAX_HEAD_BYTES};
pub use response::{Response, ResponseBody};
pub use status::StatusCode;
