//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Este módulo implementa el router que mapea (método, path) a handlers.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → Router → Handler → Response
//! ```
//!
//! Las reglas se revisan en orden de registro y hay dos tipos:
//!
//! - **Exactas** (`/`, `/user-agent`): el path debe ser idéntico.
//! - **Prefijo** (`/echo/`, `/files/`): el path empieza con el prefijo y lo
//!   que sigue es exactamente un segmento no vacío, que se captura como
//!   parámetro. `/echo`, `/echo/` y `/echo/a/b` no coinciden.
//!
//! Si ninguna regla coincide se usa el handler de 404. El segmento capturado
//! se entrega tal cual, sin decodificar `%XX`.
//!
//! El router se construye una sola vez y se comparte (solo lectura) entre
//! todos los threads de conexión.

use crate::handlers;
use crate::http::{Method, Request, Response};
use std::path::Path;

/// Datos que el router entrega a cada handler
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// Segmento capturado por una regla de prefijo (vacío en reglas exactas),
    /// en bytes tal como llegaron
    pub param: &'a [u8],

    /// Directorio raíz para las rutas `/files/`
    pub root: &'a Path,
}

/// Tipo de función handler
///
/// Un handler recibe el Request (puede consumir su body) y el contexto de la
/// ruta, y retorna una Response.
pub type Handler = fn(&mut Request<'_>, &Context<'_>) -> Response;

#[derive(Debug, Clone)]
enum Pattern {
    Exact(String),
    Prefix(String),
}

impl Pattern {
    /// Retorna el parámetro capturado si el path coincide
    fn matches<'p>(&self, path: &'p [u8]) -> Option<&'p [u8]> {
        match self {
            Pattern::Exact(exact) => (path == exact.as_bytes()).then_some(&[] as &[u8]),
            Pattern::Prefix(prefix) => {
                let segment = path.strip_prefix(prefix.as_bytes())?;
                (!segment.is_empty() && !segment.contains(&b'/')).then_some(segment)
            }
        }
    }
}

struct Route {
    method: Method,
    pattern: Pattern,
    label: String,
    handler: Handler,
}

/// Resultado de resolver una ruta: handler + parámetro capturado
#[derive(Clone, Copy)]
pub struct RouteMatch<'r, 'p> {
    /// Nombre legible de la regla, para logs (ej: "GET /echo/{value}")
    pub label: &'r str,
    pub handler: Handler,
    pub param: &'p [u8],
}

/// Router que mapea (método, path) a handlers
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Crea un nuevo router vacío
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Router con las rutas del servidor
    ///
    /// | Método | Path | Handler |
    /// |---|---|---|
    /// | GET | `/` | root |
    /// | GET | `/user-agent` | user-agent |
    /// | GET | `/echo/{value}` | echo |
    /// | GET | `/files/{name}` | lectura de archivo |
    /// | POST | `/files/{name}` | escritura de archivo |
    pub fn with_default_routes() -> Self {
        let mut router = Self::new();

        router.register_exact(Method::GET, "/", handlers::root_handler);
        router.register_exact(Method::GET, "/user-agent", handlers::user_agent_handler);
        router.register_prefix(Method::GET, "/echo/", "{value}", handlers::echo_handler);
        router.register_prefix(Method::GET, "/files/", "{name}", handlers::file_get_handler);
        router.register_prefix(Method::POST, "/files/", "{name}", handlers::file_post_handler);

        router
    }

    /// Registra una ruta exacta
    ///
    /// # Ejemplo
    /// ```
    /// use plainhttp::router::{Context, Router};
    /// use plainhttp::http::{Method, Request, Response};
    ///
    /// fn hello_handler(_req: &mut Request<'_>, _ctx: &Context<'_>) -> Response {
    ///     Response::text("Hello")
    /// }
    ///
    /// let mut router = Router::new();
    /// router.register_exact(Method::GET, "/hello", hello_handler);
    /// assert_eq!(router.resolve(&Method::GET, b"/hello").label, "GET /hello");
    /// ```
    pub fn register_exact(&mut self, method: Method, path: &str, handler: Handler) {
        let label = format!("{} {}", method, path);
        self.routes.push(Route {
            method,
            pattern: Pattern::Exact(path.to_string()),
            label,
            handler,
        });
    }

    /// Registra una ruta de prefijo. `prefix` debe terminar en '/'; `param`
    /// solo se usa para el nombre de la regla en los logs.
    pub fn register_prefix(&mut self, method: Method, prefix: &str, param: &str, handler: Handler) {
        let label = format!("{} {}{}", method, prefix, param);
        self.routes.push(Route {
            method,
            pattern: Pattern::Prefix(prefix.to_string()),
            label,
            handler,
        });
    }

    /// Encuentra la regla para (método, path), o el handler de 404
    pub fn resolve<'r, 'p>(&'r self, method: &Method, path: &'p [u8]) -> RouteMatch<'r, 'p> {
        for route in &self.routes {
            if &route.method != method {
                continue;
            }
            if let Some(param) = route.pattern.matches(path) {
                return RouteMatch {
                    label: &route.label,
                    handler: route.handler,
                    param,
                };
            }
        }

        RouteMatch {
            label: "not found",
            handler: handlers::not_found_handler,
            param: &[],
        }
    }

    /// Resuelve y ejecuta el handler apropiado para un request
    pub fn route(&self, request: &mut Request<'_>, root: &Path) -> Response {
        // El path se copia porque el handler recibe el request como &mut
        let path = request.path().to_vec();
        let matched = self.resolve(request.method(), &path);

        tracing::debug!(
            route = matched.label,
            param = %String::from_utf8_lossy(matched.param),
            "route resolved"
        );

        let context = Context {
            param: matched.param,
            root,
        };
        (matched.handler)(request, &context)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
