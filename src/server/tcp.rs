//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Servidor TCP que maneja múltiples conexiones simultáneas usando threads.
//! Cada conexión se procesa en su propio thread: se lee un request, se
//! responde y se cierra (HTTP/1.0).

use crate::articulos::{self, ArticuloResource, NanoIdGenerator};
use crate::config::Config;
use crate::http::request::{find_subsequence, parse_content_length, HEADER_TERMINATOR};
use crate::http::{ParseError, Request, Response, StatusCode};
use crate::router::{add_common_headers, Router};
use crate::store::{JsonFileStore, StoreError};
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Tamaño máximo de request line + headers
const MAX_HEADER_BYTES: usize = 8192;

/// Errores fatales del servidor (arranque)
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid route pattern: {0}")]
    Route(#[from] regex::Error),
}

/// Errores al leer un request del socket
#[derive(Debug, Error)]
enum ReadError {
    #[error("connection error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Request headers too large")]
    HeadersTooLarge,

    #[error("Request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    #[error("{0}")]
    Parse(#[from] ParseError),
}

/// Límites de lectura por conexión
#[derive(Debug, Clone, Copy)]
struct Limits {
    max_body_bytes: usize,
    read_timeout: Duration,
}

/// Servidor HTTP/1.0 concurrente
pub struct Server {
    config: Config,
    router: Arc<Router>,
    listener: Option<TcpListener>,
}

impl Server {
    /// Abre el store configurado y registra las rutas de articulos
    pub fn new(config: Config) -> Result<Self, ServerError> {
        config.validate().map_err(ServerError::Config)?;

        let store = JsonFileStore::open(&config.db_path)?;
        let resource = ArticuloResource::new(Arc::new(store), Arc::new(NanoIdGenerator::default()))
            .with_legacy_validation_errors(config.legacy_validation_errors);

        let mut router = Router::new();
        articulos::register_routes(&mut router, Arc::new(resource))?;

        Ok(Self::with_router(config, router))
    }

    /// Servidor con un router ya armado
    pub fn with_router(config: Config, router: Router) -> Self {
        Self {
            config,
            router: Arc::new(router),
            listener: None,
        }
    }

    /// Hace bind de la dirección configurada y retorna la dirección real
    /// (útil con puerto 0).
    pub fn bind(&mut self) -> Result<SocketAddr, ServerError> {
        if let Some(listener) = &self.listener {
            return listener.local_addr().map_err(|source| ServerError::Bind {
                address: self.config.address(),
                source,
            });
        }

        let address = self.config.address();
        let bind_err = |source| ServerError::Bind {
            address: address.clone(),
            source,
        };

        let listener = TcpListener::bind(&address).map_err(bind_err)?;
        let local_addr = listener.local_addr().map_err(bind_err)?;
        self.listener = Some(listener);

        Ok(local_addr)
    }

    /// Acepta conexiones indefinidamente; un thread por conexión
    pub fn run(&mut self) -> Result<(), ServerError> {
        let local_addr = self.bind()?;
        let Some(listener) = self.listener.as_ref() else {
            return Ok(());
        };

        log::info!("event=server_start address={} mode=thread_per_connection", local_addr);
        for (method, pattern) in self.router.patterns() {
            log::debug!("event=route_registered method={} pattern={}", method, pattern);
        }

        let limits = Limits {
            max_body_bytes: self.config.max_body_bytes,
            read_timeout: Duration::from_millis(self.config.read_timeout_ms),
        };

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let router = Arc::clone(&self.router);

                    let peer_addr = stream
                        .peer_addr()
                        .map(|addr| addr.to_string())
                        .unwrap_or_else(|_| "unknown".to_string());
                    log::debug!("event=connection_accepted peer={}", peer_addr);

                    thread::spawn(move || {
                        if let Err(e) = Self::handle_connection_static(stream, router, limits) {
                            log::warn!("event=connection_error peer={} error={}", peer_addr, e);
                        }
                    });
                }
                Err(e) => {
                    log::error!("event=accept_failed error={}", e);
                }
            }
        }

        Ok(())
    }

    fn handle_connection_static(
        mut stream: TcpStream,
        router: Arc<Router>,
        limits: Limits,
    ) -> std::io::Result<()> {
        let start = Instant::now();
        let request_id = format!("{:016x}", rand::random::<u64>());

        stream.set_read_timeout(Some(limits.read_timeout))?;

        let (mut response, method, path) = match read_request(&mut stream, limits.max_body_bytes) {
            Ok(None) => {
                log::debug!("event=connection_closed request_id={}", request_id);
                return Ok(());
            }
            Ok(Some(raw)) => match Request::parse(&raw) {
                Ok(request) => (
                    router.route(&request),
                    request.method().as_str(),
                    request.path().to_string(),
                ),
                Err(e) => {
                    log::warn!("event=parse_error request_id={} error={}", request_id, e);
                    (
                        Response::error(StatusCode::BadRequest, &format!("Invalid: {}", e)),
                        "-",
                        "-".to_string(),
                    )
                }
            },
            Err(ReadError::Io(e)) => return Err(e),
            Err(e @ ReadError::BodyTooLarge { .. }) => {
                (Response::error(StatusCode::PayloadTooLarge, &e.to_string()), "-", "-".to_string())
            }
            Err(e) => {
                log::warn!("event=parse_error request_id={} error={}", request_id, e);
                (
                    Response::error(StatusCode::BadRequest, &format!("Invalid: {}", e)),
                    "-",
                    "-".to_string(),
                )
            }
        };

        // Los errores de framing no pasan por el router
        add_common_headers(&mut response);
        response.add_header("X-Request-Id", &request_id);

        stream.write_all(&response.to_bytes())?;
        stream.flush()?;

        log::info!(
            "event=request request_id={} method={} path={} status={} latency_ms={:.2}",
            request_id,
            method,
            path,
            response.status().as_u16(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(())
    }
}

/// Lee un request completo: headers hasta `\r\n\r\n` y luego
/// `Content-Length` bytes de body.
///
/// `Ok(None)` si el peer cerró sin mandar nada. Si el peer cierra antes de
/// completar, se retorna lo recibido y el parser decide.
fn read_request(stream: &mut impl Read, max_body_bytes: usize) -> Result<Option<Vec<u8>>, ReadError> {
    let mut buffer = Vec::with_capacity(1024);
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = find_subsequence(&buffer, HEADER_TERMINATOR) {
            break pos;
        }
        if buffer.len() > MAX_HEADER_BYTES {
            return Err(ReadError::HeadersTooLarge);
        }

        let n = stream.read(&mut chunk)?;
        if n == 0 {
            if buffer.is_empty() {
                return Ok(None);
            }
            return Ok(Some(buffer));
        }
        buffer.extend_from_slice(&chunk[..n]);
    };

    let content_length = content_length_of(&buffer[..header_end])?;
    if content_length > max_body_bytes {
        return Err(ReadError::BodyTooLarge {
            limit: max_body_bytes,
        });
    }

    let expected = header_end + HEADER_TERMINATOR.len() + content_length;
    while buffer.len() < expected {
        let n = stream.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);
    }

    Ok(Some(buffer))
}

/// Valor de Content-Length en la cabecera cruda (0 si no viene)
fn content_length_of(head: &[u8]) -> Result<usize, ParseError> {
    let head = String::from_utf8_lossy(head);
    for line in head.split("\r\n").skip(1) {
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                return parse_content_length(value);
            }
        }
    }
    Ok(0)
}
