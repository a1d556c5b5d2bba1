//! # Handlers Básicos
//! src/handlers/basic.rs
//!
//! - `/`: Raíz, 200 sin body
//! - `/echo/{value}`: Devuelve el segmento tal cual
//! - `/user-agent`: Devuelve el header User-Agent
//! - 404 para todo lo demás

use crate::http::{Request, Response, StatusCode};
use crate::router::Context;

/// Handler para GET /
pub fn root_handler(_req: &mut Request<'_>, _ctx: &Context<'_>) -> Response {
    Response::new(StatusCode::Ok)
}

/// Handler para GET /echo/{value}
///
/// El body es el segmento capturado, byte por byte, sin decodificar.
///
/// # Ejemplo de response
/// ```text
/// HTTP/1.1 200 OK
/// Content-Type: text/plain
/// Content-Length: 3
///
/// abc
/// ```
pub fn echo_handler(_req: &mut Request<'_>, ctx: &Context<'_>) -> Response {
    Response::text(ctx.param).encodable()
}

/// Handler para GET /user-agent
///
/// El valor sale byte por byte como llegó. Si el cliente no mandó
/// `User-Agent` el body va vacío.
pub fn user_agent_handler(req: &mut Request<'_>, _ctx: &Context<'_>) -> Response {
    let user_agent = req.header("User-Agent").unwrap_or_default();
    Response::text(user_agent).encodable()
}

/// Handler por defecto cuando ninguna ruta coincide
pub fn not_found_handler(_req: &mut Request<'_>, _ctx: &Context<'_>) -> Response {
    Response::new(StatusCode::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{ResponseBody, DEFAULT_MAX_HEAD_BYTES};
    use std::path::Path;

    fn call(handler: crate::router::Handler, raw: &[u8], param: &[u8]) -> Response {
        let mut reader = raw;
        let mut request = Request::read_from(&mut reader, DEFAULT_MAX_HEAD_BYTES).unwrap();
        let ctx = Context {
            param,
            root: Path::new("."),
        };
        handler(&mut request, &ctx)
    }

    fn body(response: &Response) -> &[u8] {
        match response.body() {
            ResponseBody::Bytes(bytes) => bytes,
            ResponseBody::File { .. } => panic!("expected an in-memory body"),
        }
    }

    #[test]
    fn test_root() {
        let response = call(root_handler, b"GET / HTTP/1.1\r\n\r\n", b"");

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.content_length(), 0);
        assert_eq!(response.content_type(), None);
    }

    #[test]
    fn test_echo() {
        let response = call(echo_handler, b"GET /echo/abc HTTP/1.1\r\n\r\n", b"abc");

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.content_type(), Some("text/plain"));
        assert_eq!(body(&response), b"abc");
        assert!(response.is_encodable());
    }

    #[test]
    fn test_echo_keeps_percent_escapes() {
        let response = call(echo_handler, b"GET /echo/a%20b HTTP/1.1\r\n\r\n", b"a%20b");
        assert_eq!(body(&response), b"a%20b");
    }

    #[test]
    fn test_user_agent() {
        let raw = b"GET /user-agent HTTP/1.1\r\nUser-Agent: test-agent/1.0\r\n\r\n";
        let response = call(user_agent_handler, raw, b"");

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(body(&response), b"test-agent/1.0");
        assert_eq!(response.content_length(), 14);
    }

    #[test]
    fn test_echo_non_utf8_segment() {
        let response = call(echo_handler, b"GET /echo/caf\xe9 HTTP/1.1\r\n\r\n", b"caf\xe9");

        assert_eq!(body(&response), b"caf\xe9");
        assert_eq!(response.content_length(), 4);
    }

    #[test]
    fn test_user_agent_non_utf8_value() {
        let raw = b"GET /user-agent HTTP/1.1\r\nUser-Agent: caf\xe9\r\n\r\n";
        let response = call(user_agent_handler, raw, b"");

        assert_eq!(body(&response), b"caf\xe9");
        assert_eq!(response.content_length(), 4);
    }

    #[test]
    fn test_user_agent_missing() {
        let response = call(user_agent_handler, b"GET /user-agent HTTP/1.1\r\n\r\n", b"");

        assert_eq!(response.status(), StatusCode::Ok);
        assert!(body(&response).is_empty());
    }

    #[test]
    fn test_not_found() {
        let response = call(not_found_handler, b"GET /nope HTTP/1.1\r\n\r\n", b"");

        assert_eq!(response.status(), StatusCode::NotFound);
        assert_eq!(response.content_length(), 0);
    }
}
