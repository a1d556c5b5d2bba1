//! # Codificación de Contenido (gzip)
//! src/http/encoding.rs
//!
//! Negociación de `Accept-Encoding` y compresión del body con gzip.
//!
//! La compresión termina (`finish()`) antes de que se conozca el
//! `Content-Length`, así que el largo anunciado es siempre el del body
//! comprimido.

use super::request::trim_ows;
use super::{Headers, Response, ResponseBody};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{self, Read, Write};

/// Codificaciones que el servidor sabe aplicar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Gzip,
}

impl ContentEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentEncoding::Gzip => "gzip",
        }
    }
}

/// Indica si el cliente anuncia gzip en `Accept-Encoding`.
///
/// Revisa todas las apariciones del header, separa por comas e ignora
/// mayúsculas y parámetros. `gzip;q=0` cuenta como rechazo.
///
/// # Ejemplo
/// ```
/// use plainhttp::http::{accepts_gzip, Headers};
///
/// let mut headers = Headers::new();
/// headers.append("Accept-Encoding", "invalid-1, GZIP, invalid-2");
/// assert!(accepts_gzip(&headers));
/// ```
pub fn accepts_gzip(headers: &Headers) -> bool {
    headers
        .get_all("Accept-Encoding")
        .flat_map(|value| value.split(|&b| b == b','))
        .any(|item| {
            let mut params = item.split(|&b| b == b';');
            let coding = params.next().map(trim_ows).unwrap_or_default();
            coding.eq_ignore_ascii_case(b"gzip") && !params.any(is_zero_quality)
        })
}

/// `q=0`, `q=0.0`, `q=0.000`
fn is_zero_quality(param: &[u8]) -> bool {
    let Some(eq) = param.iter().position(|&b| b == b'=') else {
        return false;
    };
    if !trim_ows(&param[..eq]).eq_ignore_ascii_case(b"q") {
        return false;
    }
    match trim_ows(&param[eq + 1..]).split_first() {
        Some((b'0', rest)) => match rest.split_first() {
            None => true,
            Some((b'.', frac)) => frac.iter().all(|&b| b == b'0'),
            Some(_) => false,
        },
        _ => false,
    }
}

/// Aplica gzip a la respuesta si el handler lo permite y el cliente lo acepta.
///
/// Si no corresponde comprimir, la respuesta sale intacta. Un body de
/// archivo se comprime leyéndolo en streaming; si el archivo termina antes
/// de lo anunciado se retorna `UnexpectedEof`.
pub fn negotiate(mut response: Response, accepts_gzip: bool) -> io::Result<Response> {
    if !accepts_gzip || !response.is_encodable() {
        return Ok(response);
    }

    let compressed = match response.take_body() {
        ResponseBody::Bytes(bytes) => gzip(&mut bytes.as_slice(), bytes.len() as u64)?,
        ResponseBody::File { file, len } => gzip(&mut file.take(len), len)?,
    };

    response.set_encoded_body(ContentEncoding::Gzip, compressed);
    Ok(response)
}

/// Comprime exactamente `expected` bytes de `input`
fn gzip<R: Read>(input: &mut R, expected: u64) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    let copied = io::copy(input, &mut encoder)?;
    if copied != expected {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("body ended after {} of {} bytes", copied, expected),
        ));
    }
    encoder.flush()?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::StatusCode;
    use flate2::read::GzDecoder;
    use std::io::{Seek, SeekFrom};

    fn headers(values: &[&str]) -> Headers {
        let mut headers = Headers::new();
        for value in values {
            headers.append("Accept-Encoding", value);
        }
        headers
    }

    fn gunzip(bytes: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        GzDecoder::new(bytes).read_to_end(&mut out).unwrap();
        out
    }

    fn body_bytes(response: &Response) -> &[u8] {
        match response.body() {
            ResponseBody::Bytes(bytes) => bytes,
            ResponseBody::File { .. } => panic!("expected an in-memory body"),
        }
    }

    #[test]
    fn test_accepts_gzip_single() {
        assert!(accepts_gzip(&headers(&["gzip"])));
    }

    #[test]
    fn test_accepts_gzip_in_list() {
        assert!(accepts_gzip(&headers(&["invalid-1, gzip, invalid-2"])));
        assert!(accepts_gzip(&headers(&["deflate", "br, gzip"])));
    }

    #[test]
    fn test_accepts_gzip_case_and_params() {
        assert!(accepts_gzip(&headers(&["GZip;q=0.8"])));
        assert!(accepts_gzip(&headers(&[" gzip ; q=1"])));
    }

    #[test]
    fn test_gzip_refused_with_zero_quality() {
        assert!(!accepts_gzip(&headers(&["gzip;q=0"])));
        assert!(!accepts_gzip(&headers(&["gzip; q=0.000"])));
    }

    #[test]
    fn test_no_gzip() {
        assert!(!accepts_gzip(&Headers::new()));
        assert!(!accepts_gzip(&headers(&["invalid-1, invalid-2"])));
        // "x-gzip" no es "gzip"
        assert!(!accepts_gzip(&headers(&["x-gzip"])));
    }

    #[test]
    fn test_negotiate_compresses_encodable() {
        let response = negotiate(Response::text("abc").encodable(), true).unwrap();

        assert_eq!(response.content_encoding(), Some(ContentEncoding::Gzip));
        let body = body_bytes(&response);
        assert_eq!(response.content_length(), body.len() as u64);
        assert_eq!(gunzip(body), b"abc");
    }

    #[test]
    fn test_negotiate_without_gzip_keeps_body() {
        let response = negotiate(Response::text("abc").encodable(), false).unwrap();

        assert_eq!(response.content_encoding(), None);
        assert_eq!(body_bytes(&response), b"abc");
        assert_eq!(response.content_length(), 3);
    }

    #[test]
    fn test_negotiate_skips_non_encodable() {
        let response = negotiate(Response::new(StatusCode::NotFound), true).unwrap();

        assert_eq!(response.content_encoding(), None);
        assert_eq!(response.content_length(), 0);
    }

    #[test]
    fn test_negotiate_file_body() {
        let data = vec![b'z'; 50_000];
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(&data).unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();

        let response = Response::new(StatusCode::Ok)
            .with_file(file, data.len() as u64)
            .encodable();
        let response = negotiate(response, true).unwrap();

        let body = body_bytes(&response);
        assert!(body.len() < data.len());
        assert_eq!(gunzip(body), data);
    }

    #[test]
    fn test_negotiate_truncated_file() {
        let file = tempfile::tempfile().unwrap();
        let response = Response::new(StatusCode::Ok).with_file(file, 10).encodable();

        let err = negotiate(response, true).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_gzip_empty_body() {
        let response = negotiate(Response::text("").encodable(), true).unwrap();

        // Un gzip vacío igual tiene header y trailer
        assert!(response.content_length() > 0);
        assert!(gunzip(body_bytes(&response)).is_empty());
    }
}
