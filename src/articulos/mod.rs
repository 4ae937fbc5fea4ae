//! # Recurso Articulos
//!
//! Mapea los verbos HTTP sobre `/articulos` y `/articulos/{id}` a
//! operaciones del [`RecordStore`](crate::store::RecordStore).
//!
//! ## Endpoints
//!
//! - `GET    /articulos`       - Lista completa
//! - `GET    /articulos/{id}`  - Un articulo
//! - `POST   /articulos`       - Crear
//! - `PUT    /articulos/{id}`  - Actualizar (merge)
//! - `DELETE /articulos/{id}`  - Eliminar
//! - `GET    /api-docs`        - Documento OpenAPI

pub mod handlers;
pub mod id;
pub mod model;
pub mod openapi;

pub use handlers::{ApiError, ArticuloResource};
pub use id::{IdGenerator, NanoIdGenerator, ID_LENGTH};
pub use model::{Articulo, ArticuloDraft, ArticuloPatch, ValidationError};

use crate::http::{Method, Response, StatusCode};
use crate::router::{PathParams, Router};
use std::sync::Arc;

/// Path base del recurso
pub const BASE_PATH: &str = "/articulos";

/// Registra las rutas del recurso en el router
pub fn register_routes(router: &mut Router, resource: Arc<ArticuloResource>) -> Result<(), regex::Error> {
    let item_path = format!("{}/{{id}}", BASE_PATH);

    let r = Arc::clone(&resource);
    router.register(Method::GET, BASE_PATH, move |_req, _params| r.list())?;

    let r = Arc::clone(&resource);
    router.register(Method::POST, BASE_PATH, move |req, _params| r.create(req.body()))?;

    let r = Arc::clone(&resource);
    router.register(Method::GET, &item_path, move |_req, params| r.get(id_param(params)))?;

    let r = Arc::clone(&resource);
    router.register(Method::PUT, &item_path, move |req, params| {
        r.update(id_param(params), req.body())
    })?;

    let r = resource;
    router.register(Method::DELETE, &item_path, move |_req, params| r.delete(id_param(params)))?;

    router.register(Method::GET, "/api-docs", |_req, _params| {
        Response::json(StatusCode::Ok, &openapi::openapi_document())
    })?;

    Ok(())
}

fn id_param(params: &PathParams) -> &str {
    // El patrón `{id}` siempre captura un segmento no vacío
    params.get("id").map(String::as_str).unwrap_or_default()
}
