//! # Lectura de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Este módulo convierte el flujo de bytes de una conexión en un [`Request`].
//!
//! ## Formato de un Request HTTP/1.1
//!
//! ```text
//! POST /files/notas.txt HTTP/1.1\r\n
//! Host: localhost:4221\r\n
//! Content-Length: 5\r\n
//! \r\n
//! hola!
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD /path HTTP/1.1`
//! 2. **Headers**: Pares `Name: Value` (uno por línea, se pueden repetir)
//! 3. **Empty Line**: `\r\n` que separa headers del body
//! 4. **Body**: Se lee bajo demanda, acotado por `Content-Length`
//!
//! El parser lee línea por línea con `BufRead::read_until`, así que al
//! terminar los headers el lector queda justo al inicio del body: los bytes
//! que ya estaban en el buffer no se pierden ni se vuelven a leer.

use std::fmt;
use std::io::{self, BufRead, Read};
use thiserror::Error;

/// Presupuesto por defecto para la request line + headers
pub const DEFAULT_MAX_HEAD_BYTES: u64 = 8192;

/// Métodos HTTP
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Obtener un recurso
    GET,

    /// POST - Enviar datos a un recurso
    POST,

    /// Cualquier otro método sintácticamente válido (HEAD, PUT, ...).
    /// El router nunca lo enruta, así que termina en 404.
    Other(String),
}

impl Method {
    /// Parsea un método HTTP desde el token de la request line
    fn parse(token: &[u8]) -> Result<Self, ParseError> {
        if token.is_empty() || !token.iter().all(|&b| is_token_byte(b)) {
            return Err(ParseError::InvalidRequestLine);
        }
        // Un token es ASCII, siempre es UTF-8 válido
        let token = std::str::from_utf8(token).map_err(|_| ParseError::InvalidRequestLine)?;

        Ok(match token {
            "GET" => Method::GET,
            "POST" => Method::POST,
            other => Method::Other(other.to_string()),
        })
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::Other(name) => name,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Headers de un request.
///
/// Los nombres se comparan sin distinguir mayúsculas y un mismo nombre puede
/// aparecer varias veces; los valores se guardan en orden de llegada. Los
/// valores son bytes: un `User-Agent` con bytes no ASCII llega intacto.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, Vec<u8>)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Agrega un valor sin reemplazar los anteriores con el mismo nombre
    pub fn append(&mut self, name: &str, value: impl AsRef<[u8]>) {
        self.entries.push((name.to_string(), value.as_ref().to_vec()));
    }

    /// Primer valor del header `name`
    ///
    /// # Ejemplo
    /// ```
    /// use plainhttp::http::Headers;
    ///
    /// let mut headers = Headers::new();
    /// headers.append("User-Agent", "curl/8.0");
    /// assert_eq!(headers.get("user-agent"), Some(&b"curl/8.0"[..]));
    /// ```
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_slice())
    }

    /// Todos los valores del header `name`, en orden de llegada
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a [u8]> + 'a {
        self.entries
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Body de un request, consumido bajo demanda.
///
/// Nunca entrega más bytes que el `Content-Length` declarado. Un request sin
/// `Content-Length` no tiene body.
pub struct Body<'a> {
    reader: io::Take<&'a mut dyn BufRead>,
    declared: Option<u64>,
}

impl<'a> Body<'a> {
    fn new(reader: &'a mut dyn BufRead, declared: Option<u64>) -> Self {
        Self {
            reader: reader.take(declared.unwrap_or(0)),
            declared,
        }
    }

    /// Longitud declarada por el cliente, si envió `Content-Length`
    pub fn declared_len(&self) -> Option<u64> {
        self.declared
    }

    /// Bytes del body que todavía no se han leído
    pub fn remaining(&self) -> u64 {
        self.reader.limit()
    }

    /// Descarta lo que quede del body
    pub fn drain(&mut self) -> io::Result<u64> {
        io::copy(&mut self.reader, &mut io::sink())
    }
}

impl Read for Body<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl fmt::Debug for Body<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body")
            .field("declared", &self.declared)
            .field("remaining", &self.remaining())
            .finish()
    }
}

/// Representa un request HTTP/1.1 parseado
#[derive(Debug)]
pub struct Request<'a> {
    /// Método HTTP (GET, POST, ...)
    method: Method,

    /// Path de la petición sin query string (ej: "/echo/abc"), en bytes
    /// tal como llegaron
    path: Vec<u8>,

    headers: Headers,

    body: Body<'a>,
}

/// Errores que pueden ocurrir al leer un request
#[derive(Debug, Error)]
pub enum ParseError {
    /// La conexión se cerró sin enviar nada
    #[error("Empty request")]
    EmptyRequest,

    /// La conexión se cerró antes de terminar los headers
    #[error("Incomplete HTTP request")]
    IncompleteRequest,

    #[error("Invalid request line format")]
    InvalidRequestLine,

    #[error("Invalid HTTP version: {0}")]
    InvalidHttpVersion(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Invalid Content-Length: {0}")]
    InvalidContentLength(String),

    /// Chunked y demás codificaciones de transferencia no se soportan
    #[error("Unsupported Transfer-Encoding: {0}")]
    UnsupportedTransferEncoding(String),

    /// Request line + headers superan el presupuesto de bytes
    #[error("Request head exceeds {0} bytes")]
    HeadTooLarge(u64),

    #[error("I/O error while reading request: {0}")]
    Io(#[from] io::Error),
}

impl ParseError {
    /// Indica si el cliente merece un 400 Bad Request.
    ///
    /// Una conexión vacía o un error de socket no se contestan: no hay a
    /// quién o no se puede.
    pub fn is_malformed(&self) -> bool {
        !matches!(self, ParseError::EmptyRequest | ParseError::Io(_))
    }
}

impl<'a> Request<'a> {
    /// Lee un request desde el flujo de la conexión
    ///
    /// # Argumentos
    ///
    /// * `reader` - Flujo con buffer de la conexión
    /// * `max_head_bytes` - Máximo de bytes para request line + headers
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use plainhttp::http::{Method, Request, DEFAULT_MAX_HEAD_BYTES};
    ///
    /// let mut raw: &[u8] = b"GET /echo/abc HTTP/1.1\r\nUser-Agent: test\r\n\r\n";
    /// let request = Request::read_from(&mut raw, DEFAULT_MAX_HEAD_BYTES).unwrap();
    ///
    /// assert_eq!(request.method(), &Method::GET);
    /// assert_eq!(request.path(), b"/echo/abc");
    /// assert_eq!(request.header("user-agent"), Some(&b"test"[..]));
    /// ```
    pub fn read_from(reader: &'a mut dyn BufRead, max_head_bytes: u64) -> Result<Self, ParseError> {
        let mut budget = max_head_bytes;

        // 1. Request line
        let request_line = read_head_line(reader, &mut budget, max_head_bytes)?
            .ok_or(ParseError::EmptyRequest)?;
        let (method, path) = Self::parse_request_line(&request_line)?;

        // 2. Headers hasta la línea vacía
        let mut headers = Headers::new();
        loop {
            let line = read_head_line(reader, &mut budget, max_head_bytes)?
                .ok_or(ParseError::IncompleteRequest)?;
            if line.is_empty() {
                break;
            }
            let (name, value) = Self::parse_header_line(&line)?;
            headers.append(name, value);
        }

        // 3. Body: solo se acota, se lee después
        if let Some(encoding) = headers.get("Transfer-Encoding") {
            return Err(ParseError::UnsupportedTransferEncoding(
                String::from_utf8_lossy(encoding).into_owned(),
            ));
        }
        let declared = Self::content_length(&headers)?;

        Ok(Request {
            method,
            path,
            headers,
            body: Body::new(reader, declared),
        })
    }

    /// Parsea la request line
    ///
    /// Formato: `GET /path?query HTTP/1.1`. El target se trabaja en bytes:
    /// puede traer bytes no ASCII y se conservan tal cual. La query se
    /// descarta.
    fn parse_request_line(line: &[u8]) -> Result<(Method, Vec<u8>), ParseError> {
        let parts: Vec<&[u8]> = line
            .split(u8::is_ascii_whitespace)
            .filter(|part| !part.is_empty())
            .collect();

        // Debe tener exactamente 3 partes: METHOD PATH VERSION
        if parts.len() != 3 {
            return Err(ParseError::InvalidRequestLine);
        }

        let method = Method::parse(parts[0])?;

        let target = parts[1];
        if !target.starts_with(b"/") {
            return Err(ParseError::InvalidRequestLine);
        }
        let path = match target.iter().position(|&b| b == b'?') {
            Some(query_start) => &target[..query_start],
            None => target,
        };

        let version = parts[2];
        if version != b"HTTP/1.0" && version != b"HTTP/1.1" {
            return Err(ParseError::InvalidHttpVersion(
                String::from_utf8_lossy(version).into_owned(),
            ));
        }

        Ok((method, path.to_vec()))
    }

    /// Parsea una línea `Name: value`
    ///
    /// El nombre no puede tener espacios (tampoco antes de ':'); el valor se
    /// recorta y se guarda en bytes, sin reinterpretarlo.
    fn parse_header_line(line: &[u8]) -> Result<(&str, &[u8]), ParseError> {
        let invalid = || ParseError::InvalidHeader(String::from_utf8_lossy(line).into_owned());

        let colon = line.iter().position(|&b| b == b':').ok_or_else(invalid)?;
        let (name, value) = (&line[..colon], &line[colon + 1..]);

        if name.is_empty() || !name.iter().all(|&b| is_token_byte(b)) {
            return Err(invalid());
        }
        let name = std::str::from_utf8(name).map_err(|_| invalid())?;

        Ok((name, trim_ows(value)))
    }

    /// Content-Length declarado. Todas las apariciones deben coincidir.
    fn content_length(headers: &Headers) -> Result<Option<u64>, ParseError> {
        let mut declared: Option<u64> = None;

        for raw in headers.get_all("Content-Length") {
            let invalid = || ParseError::InvalidContentLength(String::from_utf8_lossy(raw).into_owned());
            let text = std::str::from_utf8(raw).map_err(|_| invalid())?;

            for item in text.split(',') {
                let len: u64 = item.trim().parse().map_err(|_| invalid())?;
                match declared {
                    Some(previous) if previous != len => return Err(invalid()),
                    _ => declared = Some(len),
                }
            }
        }

        Ok(declared)
    }

    // === Métodos públicos para acceder a los campos ===

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path del request en bytes, sin decodificar
    pub fn path(&self) -> &[u8] {
        &self.path
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Primer valor de un header (sin distinguir mayúsculas)
    pub fn header(&self, name: &str) -> Option<&[u8]> {
        self.headers.get(name)
    }

    /// Body del request, para leerlo con `std::io::Read`
    pub fn body_mut(&mut self) -> &mut Body<'a> {
        &mut self.body
    }
}

/// Recorta espacios y tabs (OWS) a ambos lados de un valor
pub(crate) fn trim_ows(bytes: &[u8]) -> &[u8] {
    let is_ows = |b: &u8| *b == b' ' || *b == b'\t';
    let start = bytes.iter().position(|b| !is_ows(b)).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|b| !is_ows(b)).map_or(start, |i| i + 1);
    &bytes[start..end]
}

/// Lee una línea del head sin pasarse del presupuesto.
///
/// Retorna `Ok(None)` si la conexión se cerró antes del primer byte. La
/// línea se devuelve sin el `\r\n` (o `\n`) final.
fn read_head_line(
    reader: &mut dyn BufRead,
    budget: &mut u64,
    limit: u64,
) -> Result<Option<Vec<u8>>, ParseError> {
    let mut line = Vec::new();
    let read = Read::take(&mut *reader, *budget).read_until(b'\n', &mut line)?;
    *budget -= read as u64;

    if !line.ends_with(b"\n") {
        if *budget == 0 {
            return Err(ParseError::HeadTooLarge(limit));
        }
        if read == 0 {
            return Ok(None);
        }
        return Err(ParseError::IncompleteRequest);
    }

    line.pop();
    if line.ends_with(b"\r") {
        line.pop();
    }
    Ok(Some(line))
}

/// `tchar` de RFC 9110: bytes válidos en métodos y nombres de header
fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}
