//! # Parsing de Requests HTTP/1.0
//! src/http/request.rs
//!
//! Parser HTTP/1.0 escrito a mano. Acepta también `HTTP/1.1` en la request
//! line, pero siempre responde como HTTP/1.0 y cierra la conexión.
//!
//! ## Formato de un Request
//!
//! ```text
//! PUT /articulos/Gis123 HTTP/1.0\r\n
//! Content-Type: application/json\r\n
//! Content-Length: 17\r\n
//! \r\n
//! {"marca":"Gloria"}
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD /path?query HTTP/1.0`
//! 2. **Headers**: Pares `Name: Value` (uno por línea)
//! 3. **Empty Line**: `\r\n` que separa headers del body
//! 4. **Body**: Bytes restantes, recortados a `Content-Length` si viene

use std::collections::HashMap;
use thiserror::Error;

/// Separador entre headers y body
pub(crate) const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Métodos HTTP soportados
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET - Obtener un recurso
    GET,

    /// HEAD - Como GET pero solo retorna headers
    HEAD,

    /// POST - Crear un recurso
    POST,

    /// PUT - Actualizar (merge) un recurso
    PUT,

    /// DELETE - Eliminar un recurso
    DELETE,

    /// OPTIONS - Preflight CORS
    OPTIONS,
}

impl Method {
    /// Parsea un método HTTP desde un string
    ///
    /// # Errores
    ///
    /// Retorna error si el método no es soportado
    fn from_str(s: &str) -> Result<Self, ParseError> {
        match s {
            "GET" => Ok(Method::GET),
            "HEAD" => Ok(Method::HEAD),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            "OPTIONS" => Ok(Method::OPTIONS),
            _ => Err(ParseError::UnsupportedMethod(s.to_string())),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::OPTIONS => "OPTIONS",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Representa un request HTTP parseado
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP
    method: Method,

    /// Path de la petición, sin query (ej: "/articulos/Gis123")
    path: String,

    /// Headers HTTP; las claves se guardan en minúsculas
    headers: HashMap<String, String>,

    /// Versión HTTP ("HTTP/1.0" o "HTTP/1.1")
    version: String,

    /// Body crudo del request
    body: Vec<u8>,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Request vacío
    #[error("Empty request")]
    EmptyRequest,

    /// Formato inválido de la request line
    #[error("Invalid request line format")]
    InvalidRequestLine,

    /// Método HTTP no soportado
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// Versión HTTP incorrecta
    #[error("Invalid HTTP version: {0}")]
    InvalidHttpVersion(String),

    /// Header malformado
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Content-Length que no es un entero
    #[error("Invalid Content-Length: {0}")]
    InvalidContentLength(String),
}

impl Request {
    /// Parsea un request HTTP desde bytes
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use articulos_server::http::{Method, Request};
    ///
    /// let raw = b"POST /articulos HTTP/1.0\r\nContent-Length: 18\r\n\r\n{\"nombre\":\"Leche\"}";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.method(), Method::POST);
    /// assert_eq!(request.path(), "/articulos");
    /// assert_eq!(request.body(), br#"{"nombre":"Leche"}"#);
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        // Separar cabecera y body a nivel de bytes: el body puede no ser UTF-8
        let (head, body) = match find_subsequence(buffer, HEADER_TERMINATOR) {
            Some(pos) => (&buffer[..pos], &buffer[pos + HEADER_TERMINATOR.len()..]),
            None => (buffer, &[][..]),
        };

        let head_str = std::str::from_utf8(head).map_err(|_| ParseError::InvalidRequestLine)?;

        if head_str.trim().is_empty() {
            return Err(ParseError::EmptyRequest);
        }

        let mut lines = head_str.split("\r\n");
        let request_line = lines.next().ok_or(ParseError::EmptyRequest)?;

        // 1. Request line
        let (method, path, version) = Self::parse_request_line(request_line)?;

        // 2. Headers
        let headers = Self::parse_headers(lines)?;

        // 3. Body, recortado a Content-Length cuando viene
        let body = match headers.get("content-length") {
            Some(raw) => {
                let len = parse_content_length(raw)?;
                body[..len.min(body.len())].to_vec()
            }
            None => body.to_vec(),
        };

        Ok(Request {
            method,
            path,
            headers,
            version,
            body,
        })
    }

    /// Parsea la request line (primera línea del request)
    ///
    /// Formato: `GET /path?query HTTP/1.0`
    fn parse_request_line(
        line: &str,
    ) -> Result<(Method, String, String), ParseError> {
        let parts: Vec<&str> = line.split_whitespace().collect();

        // Debe tener exactamente 3 partes: METHOD PATH VERSION
        if parts.len() != 3 {
            return Err(ParseError::InvalidRequestLine);
        }

        let method = Method::from_str(parts[0])?;
        // La API no usa query string: se descarta
        let path = match parts[1].split_once('?') {
            Some((path, _query)) => path.to_string(),
            None => parts[1].to_string(),
        };

        let version = parts[2].to_string();
        if version != "HTTP/1.0" && version != "HTTP/1.1" {
            return Err(ParseError::InvalidHttpVersion(version));
        }

        Ok((method, path, version))
    }

    /// Parsea los headers HTTP
    ///
    /// Cada header tiene formato: "Name: Value"
    fn parse_headers<'a>(
        lines: impl Iterator<Item = &'a str>,
    ) -> Result<HashMap<String, String>, ParseError> {
        let mut headers = HashMap::new();

        for line in lines {
            if line.trim().is_empty() {
                break;
            }

            match line.split_once(':') {
                Some((name, value)) => {
                    headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
                }
                None => return Err(ParseError::InvalidHeader(line.to_string())),
            }
        }

        Ok(headers)
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> Method {
        self.method
    }

    /// Obtiene el path del request
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene un header sin distinguir mayúsculas/minúsculas
    ///
    /// # Ejemplo
    /// ```
    /// use articulos_server::http::Request;
    ///
    /// let raw = b"GET / HTTP/1.0\r\nContent-Type: application/json\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.header("content-type"), Some("application/json"));
    /// assert_eq!(request.header("Content-Type"), Some("application/json"));
    /// ```
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|s| s.as_str())
    }

    /// Obtiene la versión HTTP
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Obtiene el body del request
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Interpreta el valor de un header Content-Length
pub(crate) fn parse_content_length(raw: &str) -> Result<usize, ParseError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidContentLength(raw.to_string()))
}

/// Busca la primera aparición de `needle` dentro de `haystack`
pub(crate) fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Decodifica secuencias `%XX`. Las secuencias inválidas se dejan tal cual.
pub fn url_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                decoded.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        decoded.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&decoded).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|d| d as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_get() {
        let raw = b"GET / HTTP/1.0\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.path(), "/");
        assert!(request.body().is_empty());
    }

    #[test]
    fn test_parse_with_path_param_segment() {
        let raw = b"GET /articulos/Gis123 HTTP/1.1\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.path(), "/articulos/Gis123");
        assert_eq!(request.version(), "HTTP/1.1");
    }

    #[test]
    fn test_parse_strips_query_string() {
        let raw = b"GET /articulos/Gis123?marca=Gloria&debug HTTP/1.0\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.path(), "/articulos/Gis123");
    }

    #[test]
    fn test_parse_headers_case_insensitive() {
        let raw = b"GET / HTTP/1.0\r\nHost: localhost:8080\r\nUser-Agent: test\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.header("Host"), Some("localhost:8080"));
        assert_eq!(request.header("user-agent"), Some("test"));
        assert_eq!(request.header("X-Missing"), None);
    }

    #[test]
    fn test_parse_put_body() {
        let raw = b"PUT /articulos/abc HTTP/1.0\r\nContent-Length: 15\r\n\r\n{\"marca\":\"X\"}\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.method(), Method::PUT);
        assert_eq!(request.body(), b"{\"marca\":\"X\"}\r\n");
    }

    #[test]
    fn test_body_truncated_to_content_length() {
        let raw = b"POST /articulos HTTP/1.0\r\nContent-Length: 2\r\n\r\n{}garbage";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.body(), b"{}");
    }

    #[test]
    fn test_body_without_content_length() {
        let raw = b"POST /articulos HTTP/1.0\r\n\r\n{\"nombre\":\"Leche\"}";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.body(), br#"{"nombre":"Leche"}"#);
    }

    #[test]
    fn test_delete_and_options_methods() {
        let delete = Request::parse(b"DELETE /articulos/x HTTP/1.0\r\n\r\n").unwrap();
        assert_eq!(delete.method(), Method::DELETE);

        let options = Request::parse(b"OPTIONS /articulos HTTP/1.0\r\n\r\n").unwrap();
        assert_eq!(options.method(), Method::OPTIONS);
    }

    #[test]
    fn test_url_decode() {
        assert_eq!(url_decode("hello%20world"), "hello world");
        assert_eq!(url_decode("Gis%2D123"), "Gis-123");
        assert_eq!(url_decode("100%"), "100%");
        assert_eq!(url_decode("%zz"), "%zz");
    }

    #[test]
    fn test_unsupported_method() {
        let result = Request::parse(b"PATCH / HTTP/1.0\r\n\r\n");
        assert!(matches!(result, Err(ParseError::UnsupportedMethod(_))));
    }

    #[test]
    fn test_invalid_version() {
        let result = Request::parse(b"GET / HTTP/2.0\r\n\r\n");
        assert!(matches!(result, Err(ParseError::InvalidHttpVersion(_))));
    }

    #[test]
    fn test_invalid_header() {
        let result = Request::parse(b"GET / HTTP/1.0\r\nNoColonHere\r\n\r\n");
        assert!(matches!(result, Err(ParseError::InvalidHeader(_))));
    }

    #[test]
    fn test_invalid_content_length() {
        let result = Request::parse(b"POST / HTTP/1.0\r\nContent-Length: abc\r\n\r\n");
        assert!(matches!(result, Err(ParseError::InvalidContentLength(_))));
    }

    #[test]
    fn test_empty_request() {
        let result = Request::parse(b"");
        assert!(matches!(result, Err(ParseError::EmptyRequest)));
    }

    #[test]
    fn test_invalid_request_line() {
        let result = Request::parse(b"GET\r\n\r\n");
        assert!(matches!(result, Err(ParseError::InvalidRequestLine)));
    }

    #[test]
    fn test_find_subsequence() {
        assert_eq!(find_subsequence(b"abc\r\n\r\nbody", HEADER_TERMINATOR), Some(3));
        assert_eq!(find_subsequence(b"abc", HEADER_TERMINATOR), None);
    }
}
