//! # Handlers de Archivos
//! src/handlers/files.rs
//!
//! - GET /files/{name}: Devuelve el archivo completo
//! - POST /files/{name}: Escribe el body del request en el archivo
//!
//! Los archivos viven bajo el directorio raíz configurado (`--directory`).
//! El nombre llega sin decodificar. Se rechaza (400) si está vacío, si es
//! `.` o `..`, si trae `\` o NUL, o si no es UTF-8. Un `/` nunca llega
//! aquí: el router solo captura un segmento.
//!
//! No hay exclusión entre conexiones: si dos POST escriben el mismo archivo
//! gana el último, y un GET concurrente puede ver el archivo a medio escribir.

use crate::http::{Body, Request, Response, StatusCode};
use crate::router::Context;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errores al resolver, leer o escribir un archivo
#[derive(Debug, Error)]
pub enum FileError {
    #[error("invalid file name: {0:?}")]
    InvalidName(String),

    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FileError {
    /// "No existe" se separa de cualquier otro error de I/O
    fn from_io(path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            FileError::NotFound(path)
        } else {
            FileError::Io { path, source }
        }
    }

    /// Código HTTP con el que se contesta este error
    pub fn status(&self) -> StatusCode {
        match self {
            FileError::InvalidName(_) => StatusCode::BadRequest,
            FileError::NotFound(_) => StatusCode::NotFound,
            FileError::Io { .. } => StatusCode::InternalServerError,
        }
    }
}

/// Convierte el nombre capturado en una ruta dentro de `root`
///
/// # Ejemplo
/// ```
/// use plainhttp::handlers::files::resolve_path;
/// use std::path::Path;
///
/// assert!(resolve_path(Path::new("/tmp"), b"notas.txt").is_ok());
/// assert!(resolve_path(Path::new("/tmp"), b"v1..2.txt").is_ok());
/// assert!(resolve_path(Path::new("/tmp"), b"..").is_err());
/// ```
pub fn resolve_path(root: &Path, name: &[u8]) -> Result<PathBuf, FileError> {
    let invalid = || FileError::InvalidName(String::from_utf8_lossy(name).into_owned());

    let name = std::str::from_utf8(name).map_err(|_| invalid())?;
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
        return Err(invalid());
    }
    Ok(root.join(name))
}

/// Abre un archivo regular para leerlo completo. Retorna el archivo y su
/// largo según la metadata.
pub fn open_for_read(root: &Path, name: &[u8]) -> Result<(File, u64), FileError> {
    let path = resolve_path(root, name)?;

    let file = File::open(&path).map_err(|e| FileError::from_io(path.clone(), e))?;
    let metadata = file
        .metadata()
        .map_err(|e| FileError::from_io(path.clone(), e))?;

    // Un directorio no es un archivo servible
    if !metadata.is_file() {
        return Err(FileError::NotFound(path));
    }

    Ok((file, metadata.len()))
}

/// Crea (o trunca) el archivo y copia todo el body en él.
///
/// Se copian exactamente los bytes declarados en `Content-Length`. Si el
/// body llega incompleto o falla la escritura, el archivo parcial se borra.
pub fn write_from(root: &Path, name: &[u8], body: &mut Body<'_>) -> Result<u64, FileError> {
    let path = resolve_path(root, name)?;

    // Para escritura cualquier fallo es 500, incluso si falta el directorio
    let file = File::create(&path).map_err(|source| FileError::Io {
        path: path.clone(),
        source,
    })?;

    match copy_body(file, body) {
        Ok(written) => Ok(written),
        Err(source) => {
            if let Err(e) = fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), error = %e, "could not remove partial file");
            }
            Err(FileError::Io { path, source })
        }
    }
}

fn copy_body(file: File, body: &mut Body<'_>) -> io::Result<u64> {
    let mut writer = BufWriter::new(file);
    let written = io::copy(body, &mut writer)?;

    if body.remaining() > 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!(
                "body ended after {} of {} bytes",
                written,
                written + body.remaining()
            ),
        ));
    }

    writer.into_inner().map_err(|e| e.into_error())?;
    Ok(written)
}

fn error_response(err: FileError) -> Response {
    match &err {
        FileError::Io { .. } => tracing::warn!(error = %err, "file operation failed"),
        _ => tracing::debug!(error = %err, "file request rejected"),
    }
    Response::new(err.status())
}

/// Handler para GET /files/{name}
///
/// 200 con el archivo completo (`application/octet-stream`), 404 si no
/// existe, 500 ante cualquier otro error de I/O.
pub fn file_get_handler(_req: &mut Request<'_>, ctx: &Context<'_>) -> Response {
    match open_for_read(ctx.root, ctx.param) {
        Ok((file, len)) => Response::new(StatusCode::Ok)
            .with_content_type("application/octet-stream")
            .with_file(file, len)
            .encodable(),
        Err(e) => error_response(e),
    }
}

/// Handler para POST /files/{name}
///
/// 201 si el body completo quedó escrito, 500 ante cualquier error de I/O.
pub fn file_post_handler(req: &mut Request<'_>, ctx: &Context<'_>) -> Response {
    match write_from(ctx.root, ctx.param, req.body_mut()) {
        Ok(written) => {
            tracing::debug!(name = %String::from_utf8_lossy(ctx.param), bytes = written, "file written");
            Response::new(StatusCode::Created)
        }
        Err(e) => error_response(e),
    }
}
