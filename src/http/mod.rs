//! # Módulo HTTP
//!
//! Implementa el protocolo HTTP/1.0 desde cero, sin usar librerías de alto
//! nivel:
//!
//! - Parsing de requests (incluido el body de POST/PUT)
//! - Construcción de responses HTTP
//! - Manejo de status codes
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.0 200 OK\r\n
//! Content-Type: application/json; charset=utf-8\r\n
//! Content-Length: 2\r\n
//! \r\n
//! []
//! ```

pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

pub use request::{Method, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
