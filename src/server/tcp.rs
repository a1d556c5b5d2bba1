//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Implementación del servidor TCP que maneja múltiples conexiones
//! simultáneas usando threads. Cada conexión se procesa en su propio thread
//! y atiende exactamente un request:
//!
//! ```text
//! accept → leer request → router → handler → gzip → escribir → cerrar
//! ```
//!
//! El loop de accept solo acepta y despacha. Los errores (y panics) de una
//! conexión se registran dentro de su thread y nunca llegan al listener.

use crate::config::Config;
use crate::error::ServerError;
use crate::http::{accepts_gzip, negotiate, ParseError, Request, Response, StatusCode};
use crate::router::Router;
use std::io::{self, BufReader};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Pausa tras el primer accept fallido; se duplica en cada fallo seguido
const ACCEPT_BACKOFF_MIN: Duration = Duration::from_millis(10);
const ACCEPT_BACKOFF_MAX: Duration = Duration::from_secs(1);

/// Servidor HTTP/1.1 concurrente
pub struct Server {
    config: Arc<Config>,
    router: Arc<Router>,
    listener: TcpListener,
}

impl Server {
    /// Abre el puerto de escucha. Es el único error fatal del servidor.
    pub fn bind(config: Config) -> Result<Self, ServerError> {
        let address = config.address();
        let listener =
            TcpListener::bind(&address).map_err(|source| ServerError::Bind { address, source })?;

        Ok(Self {
            config: Arc::new(config),
            router: Arc::new(Router::with_default_routes()),
            listener,
        })
    }

    /// Dirección real de escucha (útil con el puerto 0)
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Acepta conexiones para siempre, un thread por conexión
    pub fn run(&self) -> Result<(), ServerError> {
        let address = self.local_addr().map_err(ServerError::Accept)?;
        tracing::info!(%address, "server listening");

        let mut next_id: u64 = 0;
        let mut failures: u32 = 0;
        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    failures = 0;
                    next_id += 1;
                    self.spawn_connection(next_id, stream);
                }
                Err(e) => {
                    // Un accept fallido no detiene el listener, pero con
                    // EMFILE fallaría en seguida otra vez
                    failures = failures.saturating_add(1);
                    let pause = accept_backoff(failures);
                    tracing::warn!(
                        error = %ServerError::Accept(e),
                        failures,
                        backoff_ms = pause.as_millis() as u64,
                        "accept failed"
                    );
                    thread::sleep(pause);
                }
            }
        }

        Ok(())
    }

    fn spawn_connection(&self, id: u64, stream: TcpStream) {
        let router = Arc::clone(&self.router);
        let config = Arc::clone(&self.config);

        let spawned = thread::Builder::new()
            .name(format!("conn-{}", id))
            .spawn(move || {
                let peer = stream
                    .peer_addr()
                    .map(|addr| addr.to_string())
                    .unwrap_or_else(|_| "unknown".to_string());

                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    handle_connection(stream, &router, &config)
                }));

                match outcome {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => tracing::warn!(conn = id, %peer, error = %e, "connection failed"),
                    Err(_) => tracing::error!(conn = id, %peer, "connection handler panicked"),
                }
            });

        if let Err(e) = spawned {
            tracing::warn!(conn = id, error = %e, "could not spawn connection thread");
        }
    }
}

/// Pausa antes de reintentar tras `failures` accepts fallidos seguidos
fn accept_backoff(failures: u32) -> Duration {
    let factor = 1u32 << failures.saturating_sub(1).min(16);
    ACCEPT_BACKOFF_MIN.saturating_mul(factor).min(ACCEPT_BACKOFF_MAX)
}

/// Atiende un request completo sobre `stream` y cierra la conexión.
///
/// Toda falla de parseo, ruta o archivo se contesta con un código HTTP. Solo
/// se retorna error cuando el socket mismo falla; en ese caso no se intenta
/// escribir otra respuesta.
pub fn handle_connection(stream: TcpStream, router: &Router, config: &Config) -> Result<(), ServerError> {
    let start = Instant::now();

    let peer = stream
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    let mut reader = BufReader::new(stream.try_clone().map_err(ServerError::Read)?);
    let mut writer = stream;

    let (method, path, response) = match Request::read_from(&mut reader, config.max_header_bytes) {
        Ok(mut request) => {
            let method = request.method().to_string();
            let path = String::from_utf8_lossy(request.path()).into_owned();
            let gzip = accepts_gzip(request.headers());

            let response = router.route(&mut request, &config.directory);

            // Lo que el handler no leyó del body se descarta
            if let Err(e) = request.body_mut().drain() {
                tracing::debug!(error = %e, "could not drain request body");
            }

            let response = match negotiate(response, gzip) {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(%peer, %method, %path, error = %e, "could not encode response body");
                    Response::new(StatusCode::InternalServerError)
                }
            };

            (method, path, response)
        }
        Err(ParseError::EmptyRequest) => {
            tracing::debug!(%peer, "connection closed without a request");
            return Ok(());
        }
        Err(ParseError::Io(e)) => return Err(ServerError::Read(e)),
        Err(e) => {
            tracing::info!(%peer, error = %e, "malformed request");
            ("-".to_string(), "-".to_string(), Response::new(StatusCode::BadRequest))
        }
    };

    let status = response.status();
    let length = response.content_length();
    let encoding = response.content_encoding().map(|e| e.as_str()).unwrap_or("identity");

    response.write_to(&mut writer).map_err(ServerError::WriteFailure)?;

    if let Err(e) = writer.shutdown(Shutdown::Write) {
        tracing::debug!(error = %e, "shutdown after response failed");
    }

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    if status.is_server_error() {
        tracing::warn!(
            %peer,
            %method,
            %path,
            status = status.as_u16(),
            bytes = length,
            encoding,
            elapsed_ms,
            "request failed"
        );
    } else {
        tracing::info!(
            %peer,
            %method,
            %path,
            status = status.as_u16(),
            bytes = length,
            encoding,
            elapsed_ms,
            "request served"
        );
    }

    Ok(())
}
