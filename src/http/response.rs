//! # Construcción y Escritura de Respuestas HTTP
//! src/http/response.rs
//!
//! Este módulo proporciona una API para construir respuestas HTTP/1.1 y
//! escribirlas en la conexión.
//!
//! ## Formato de una respuesta
//!
//! Los headers salen siempre en el mismo orden:
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain\r\n
//! Content-Encoding: gzip\r\n      (solo si se comprimió)
//! Content-Length: 3\r\n
//! \r\n
//! abc
//! ```
//!
//! `Content-Length` no se guarda como header: se calcula del body justo al
//! escribir, así nunca puede quedar desfasado.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use plainhttp::http::{Response, StatusCode};
//!
//! let response = Response::text("Hello");
//!
//! let mut wire = Vec::new();
//! response.write_to(&mut wire).unwrap();
//! assert!(wire.ends_with(b"Content-Length: 5\r\n\r\nHello"));
//! ```

use super::{ContentEncoding, StatusCode};
use std::fs::File;
use std::io::{self, Read, Write};

/// Cuerpo de la respuesta
#[derive(Debug)]
pub enum ResponseBody {
    /// Bytes en memoria
    Bytes(Vec<u8>),

    /// Archivo abierto que se copia directo al socket. `len` se toma de la
    /// metadata al abrirlo y es lo que se anuncia en `Content-Length`.
    File { file: File, len: u64 },
}

impl ResponseBody {
    /// Cantidad exacta de bytes que se escribirán
    pub fn len(&self) -> u64 {
        match self {
            ResponseBody::Bytes(bytes) => bytes.len() as u64,
            ResponseBody::File { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Representa una respuesta HTTP/1.1 completa
#[derive(Debug)]
pub struct Response {
    /// Código de estado HTTP (200, 404, etc.)
    status: StatusCode,

    content_type: Option<String>,

    /// Solo lo asigna el codificador de contenido
    content_encoding: Option<ContentEncoding>,

    body: ResponseBody,

    /// El handler acepta que su body se comprima
    encodable: bool,
}

impl Response {
    /// Crea una respuesta sin headers ni body
    ///
    /// # Ejemplo
    /// ```
    /// use plainhttp::http::{Response, StatusCode};
    ///
    /// let response = Response::new(StatusCode::NotFound);
    /// assert_eq!(response.content_length(), 0);
    /// ```
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            content_type: None,
            content_encoding: None,
            body: ResponseBody::Bytes(Vec::new()),
            encodable: false,
        }
    }

    /// Respuesta 200 `text/plain` con el texto dado. Los bytes se copian tal
    /// cual, sin exigir UTF-8.
    pub fn text(body: impl AsRef<[u8]>) -> Self {
        Self::new(StatusCode::Ok)
            .with_content_type("text/plain")
            .with_body_bytes(body.as_ref().to_vec())
    }

    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.to_string());
        self
    }

    /// Establece el cuerpo de la respuesta desde bytes
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.body = ResponseBody::Bytes(body);
        self
    }

    /// Usa un archivo abierto como cuerpo; se copia en streaming al escribir
    pub fn with_file(mut self, file: File, len: u64) -> Self {
        self.body = ResponseBody::File { file, len };
        self
    }

    /// Marca el body como comprimible si el cliente lo negocia
    pub fn encodable(mut self) -> Self {
        self.encodable = true;
        self
    }

    /// Reemplaza el body por su versión codificada
    pub(crate) fn set_encoded_body(&mut self, encoding: ContentEncoding, body: Vec<u8>) {
        self.content_encoding = Some(encoding);
        self.body = ResponseBody::Bytes(body);
    }

    /// Toma el body dejando uno vacío en su lugar
    pub(crate) fn take_body(&mut self) -> ResponseBody {
        std::mem::replace(&mut self.body, ResponseBody::Bytes(Vec::new()))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn content_encoding(&self) -> Option<ContentEncoding> {
        self.content_encoding
    }

    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    pub fn is_encodable(&self) -> bool {
        self.encodable
    }

    /// Valor del header `Content-Length`
    pub fn content_length(&self) -> u64 {
        self.body.len()
    }

    /// Status line + headers + línea vacía
    ///
    /// Orden fijo: Content-Type, Content-Encoding, Content-Length.
    pub fn head_bytes(&self) -> Vec<u8> {
        let mut head = format!("HTTP/1.1 {}\r\n", self.status);

        if let Some(content_type) = &self.content_type {
            head.push_str(&format!("Content-Type: {}\r\n", content_type));
        }
        if let Some(encoding) = self.content_encoding {
            head.push_str(&format!("Content-Encoding: {}\r\n", encoding.as_str()));
        }
        head.push_str(&format!("Content-Length: {}\r\n", self.content_length()));
        head.push_str("\r\n");

        head.into_bytes()
    }

    /// Escribe la respuesta completa en `out`.
    ///
    /// Consume la respuesta: una vez escrita (o fallida) no hay forma de
    /// enviarla otra vez. Si un archivo se acaba antes de `len` bytes se
    /// retorna `UnexpectedEof`; el llamador debe cerrar la conexión.
    pub fn write_to<W: Write>(self, out: &mut W) -> io::Result<()> {
        let head = self.head_bytes();

        match self.body {
            ResponseBody::Bytes(mut body) => {
                // Un solo write para head + body
                let mut wire = head;
                wire.append(&mut body);
                out.write_all(&wire)?;
            }
            ResponseBody::File { file, len } => {
                out.write_all(&head)?;
                let copied = io::copy(&mut file.take(len), out)?;
                if copied != len {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!("file ended after {} of {} bytes", copied, len),
                    ));
                }
            }
        }

        out.flush()
    }
}
