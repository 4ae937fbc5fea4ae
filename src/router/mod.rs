//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Mapea (método, path) a handlers. Los patrones admiten segmentos
//! `{param}` que se compilan a expresiones regulares:
//!
//! ```text
//! /articulos/{id}  →  ^/articulos/([^/]+)/?$
//! ```
//!
//! ## Arquitectura
//!
//! ```text
//! Request → Router → Handler(&Request, &PathParams) → Response
//! ```
//!
//! - Path desconocido → 404 Not Found
//! - Path conocido con otro método → 405 Method Not Allowed + `Allow`
//! - `HEAD` usa el handler de `GET` y descarta el body
//! - `OPTIONS` responde el preflight CORS

use crate::http::{request::url_decode, Method, Request, Response, StatusCode};
use regex::Regex;
use std::collections::HashMap;

/// Parámetros capturados del path (ej: {"id": "Gis123"})
pub type PathParams = HashMap<String, String>;

/// Tipo de handler
///
/// Un handler recibe el Request y los parámetros del path, y retorna una
/// Response
pub type Handler = Box<dyn Fn(&Request, &PathParams) -> Response + Send + Sync>;

/// Ruta registrada
struct Route {
    method: Method,
    pattern: String,
    regex: Regex,
    param_names: Vec<String>,
    handler: Handler,
}

impl Route {
    /// Intenta hacer match del path y extrae los parámetros
    fn captures(&self, path: &str) -> Option<PathParams> {
        let captures = self.regex.captures(path)?;
        let params = self
            .param_names
            .iter()
            .enumerate()
            .filter_map(|(i, name)| {
                captures
                    .get(i + 1)
                    .map(|m| (name.clone(), url_decode(m.as_str())))
            })
            .collect();
        Some(params)
    }
}

/// Router que mapea (método, path) a handlers
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Crea un nuevo router vacío
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registra una ruta con su handler
    ///
    /// # Ejemplo
    /// ```
    /// use articulos_server::router::Router;
    /// use articulos_server::http::{Method, Request, Response, StatusCode};
    ///
    /// let mut router = Router::new();
    /// router
    ///     .register(Method::GET, "/hello/{name}", |_req, params| {
    ///         Response::json(StatusCode::Ok, &params["name"])
    ///     })
    ///     .unwrap();
    ///
    /// let request = Request::parse(b"GET /hello/mundo HTTP/1.0\r\n\r\n").unwrap();
    /// let response = router.route(&request);
    /// assert_eq!(response.body(), br#""mundo""#);
    /// ```
    pub fn register<F>(&mut self, method: Method, pattern: &str, handler: F) -> Result<(), regex::Error>
    where
        F: Fn(&Request, &PathParams) -> Response + Send + Sync + 'static,
    {
        let (regex, param_names) = path_to_regex(pattern)?;
        self.routes.push(Route {
            method,
            pattern: pattern.to_string(),
            regex,
            param_names,
            handler: Box::new(handler),
        });
        Ok(())
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    pub fn route(&self, request: &Request) -> Response {
        let mut response = self.dispatch(request);
        add_common_headers(&mut response);
        response
    }

    fn dispatch(&self, request: &Request) -> Response {
        let path = request.path();
        let matching: Vec<(&Route, PathParams)> = self
            .routes
            .iter()
            .filter_map(|route| route.captures(path).map(|params| (route, params)))
            .collect();

        if matching.is_empty() {
            return Response::error(StatusCode::NotFound, &format!("Route not found: {}", path));
        }

        let allowed = allowed_methods(&matching);

        if request.method() == Method::OPTIONS {
            return Response::empty(StatusCode::NoContent)
                .with_header("Allow", &allowed)
                .with_header("Access-Control-Allow-Methods", &allowed)
                .with_header("Access-Control-Allow-Headers", "Content-Type");
        }

        // HEAD se atiende con el handler de GET
        let wanted = match request.method() {
            Method::HEAD => Method::GET,
            other => other,
        };

        match matching.iter().find(|(route, _)| route.method == wanted) {
            Some((route, params)) => {
                let mut response = (route.handler)(request, params);
                if request.method() == Method::HEAD {
                    response.strip_body();
                }
                response
            }
            None => Response::error(
                StatusCode::MethodNotAllowed,
                &format!("Method {} not allowed on {}", request.method(), path),
            )
            .with_header("Allow", &allowed),
        }
    }

    /// Patrones registrados, en orden (para el log de arranque)
    pub fn patterns(&self) -> impl Iterator<Item = (Method, &str)> {
        self.routes.iter().map(|r| (r.method, r.pattern.as_str()))
    }
}

/// Agrega headers comunes a todas las respuestas, pasen o no por el router
pub(crate) fn add_common_headers(response: &mut Response) {
    response.add_header("Server", "Articulos-HTTP/1.0");
    response.add_header("Connection", "close");
    response.add_header("Access-Control-Allow-Origin", "*");
}

/// Lista de métodos para el header `Allow` (ej: "GET, HEAD, PUT, DELETE, OPTIONS")
fn allowed_methods(matching: &[(&Route, PathParams)]) -> String {
    let mut methods: Vec<Method> = Vec::new();
    for (route, _) in matching {
        if !methods.contains(&route.method) {
            methods.push(route.method);
        }
        if route.method == Method::GET && !methods.contains(&Method::HEAD) {
            methods.push(Method::HEAD);
        }
    }
    methods.push(Method::OPTIONS);

    methods
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Compila un patrón de ruta a regex. Acepta un `/` final opcional.
pub(crate) fn path_to_regex(path: &str) -> Result<(Regex, Vec<String>), regex::Error> {
    let mut pattern = String::with_capacity(path.len() + 8);
    pattern.push('^');
    let mut param_names = Vec::new();

    for segment in path.split('/').filter(|s| !s.is_empty()) {
        pattern.push('/');
        if let Some(name) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            pattern.push_str("([^/]+)");
            param_names.push(name.to_string());
        } else {
            pattern.push_str(&regex::escape(segment));
        }
    }

    pattern.push_str("/?$");
    Ok((Regex::new(&pattern)?, param_names))
}
