//! # Construcción de Respuestas HTTP
//!
//! API para construir respuestas HTTP/1.0 y convertirlas a bytes para
//! enviar al cliente.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use articulos_server::http::{Response, StatusCode};
//! use serde_json::json;
//!
//! let response = Response::json(StatusCode::Ok, &json!({"nombre": "Leche"}));
//! assert_eq!(response.header("Content-Type"), Some("application/json; charset=utf-8"));
//!
//! let bytes = response.to_bytes();
//! // Ahora puedes enviar `bytes` por el socket
//! ```

use super::StatusCode;
use serde::Serialize;
use std::collections::HashMap;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Representa una respuesta HTTP/1.0 completa
#[derive(Debug, Clone)]
pub struct Response {
    /// Código de estado HTTP (200, 404, etc.)
    status: StatusCode,

    /// Headers HTTP (Content-Type, Content-Length, etc.)
    /// Usamos HashMap para evitar duplicados
    headers: HashMap<String, String>,

    /// Cuerpo de la respuesta (puede ser vacío)
    body: Vec<u8>,
}

impl Response {
    /// Crea una nueva respuesta sin headers ni body
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Respuesta sin body con `Content-Length: 0`
    ///
    /// Es lo que devuelve la API para 404 en `GET /articulos/{id}` y para
    /// cualquier `DELETE`.
    ///
    /// ```
    /// use articulos_server::http::{Response, StatusCode};
    ///
    /// let response = Response::empty(StatusCode::NotFound);
    /// assert!(response.body().is_empty());
    /// assert_eq!(response.header("Content-Length"), Some("0"));
    /// ```
    pub fn empty(status: StatusCode) -> Self {
        Self::new(status).with_body_bytes(Vec::new())
    }

    /// Agrega un header a la respuesta. Si ya existe, se sobrescribe.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Agrega un header a una respuesta existente (versión mutable)
    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.insert(name.to_string(), value.to_string());
    }

    /// Establece el cuerpo desde bytes y actualiza `Content-Length`
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self.headers
            .insert("Content-Length".to_string(), self.body.len().to_string());
        self
    }

    /// Establece el cuerpo desde un string
    pub fn with_body(self, body: &str) -> Self {
        self.with_body_bytes(body.as_bytes().to_vec())
    }

    /// Crea una respuesta JSON serializando `value`
    ///
    /// Si la serialización falla (no debería con `serde_json::Value` ni con
    /// los tipos de la API) se responde 500 con un error JSON fijo.
    pub fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self::new(status)
                .with_header("Content-Type", JSON_CONTENT_TYPE)
                .with_body_bytes(body),
            Err(err) => {
                log::error!("event=serialize_failed status=error error={}", err);
                Self::error(StatusCode::InternalServerError, "Error al serializar la respuesta")
            }
        }
    }

    /// Crea una respuesta de error con mensaje JSON
    ///
    /// Formato del JSON: `{"error": "mensaje"}`
    ///
    /// # Ejemplo
    /// ```
    /// use articulos_server::http::{Response, StatusCode};
    ///
    /// let response = Response::error(StatusCode::BadRequest, "No se ingreso \"Nombre\"");
    /// let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
    /// assert_eq!(body["error"], "No se ingreso \"Nombre\"");
    /// ```
    pub fn error(status: StatusCode, message: &str) -> Self {
        // serde_json escapa comillas y saltos de línea del mensaje
        let body = serde_json::json!({ "error": message }).to_string();
        Self::new(status)
            .with_header("Content-Type", JSON_CONTENT_TYPE)
            .with_body(&body)
    }

    /// Descarta el body conservando `Content-Length` (respuestas a HEAD)
    pub fn strip_body(&mut self) {
        self.body.clear();
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    ///
    /// Genera el formato completo HTTP/1.0:
    /// - Status line: `HTTP/1.0 200 OK\r\n`
    /// - Headers: `Header-Name: Value\r\n`
    /// - Línea vacía: `\r\n`
    /// - Body
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(128 + self.body.len());

        result.extend_from_slice(format!("HTTP/1.0 {}\r\n", self.status).as_bytes());

        for (name, value) in &self.headers {
            result.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }

        result.extend_from_slice(b"\r\n");
        result.extend_from_slice(&self.body);

        result
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene una referencia a los headers
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene un header por nombre exacto
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
