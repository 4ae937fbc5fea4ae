//! # Articulos Server
//! src/lib.rs
//!
//! Servidor HTTP/1.0 implementado desde cero que expone una API REST de
//! articulos (productos de tienda) persistida en un documento JSON.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: Parsing y manejo del protocolo HTTP/1.0
//! - `server`: Lógica del servidor TCP y manejo de conexiones
//! - `router`: Enrutamiento de peticiones a handlers
//! - `articulos`: Recurso REST (validación, ids, handlers, OpenAPI)
//! - `store`: Persistencia del documento `{"articulos": [...]}`
//! - `config`: Argumentos CLI y variables de entorno
//! - `logging`: Inicialización del logger
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use articulos_server::config::Config;
//! use articulos_server::server::Server;
//!
//! let config = Config::default();
//! let mut server = Server::new(config).expect("Error al abrir el store");
//! server.run().expect("Error al iniciar servidor");
//! ```

#![recursion_limit = "256"]

pub mod articulos;
pub mod config;
pub mod http;
pub mod logging;
pub mod router;
pub mod server;
pub mod store;
