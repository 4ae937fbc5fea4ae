//! # Handlers HTTP para Articulos
//! src/articulos/handlers.rs
//!
//! Implementa las cinco operaciones del recurso:
//! - `GET    /articulos`       → lista completa
//! - `GET    /articulos/{id}`  → un articulo (404 sin body si no existe)
//! - `POST   /articulos`       → crea con id generado
//! - `PUT    /articulos/{id}`  → merge superficial de campos
//! - `DELETE /articulos/{id}`  → elimina (200 aunque no exista)
//!
//! Cada operación retorna `Result<Response, ApiError>` y pasa por el mismo
//! punto de mapeo de errores (`respond`), que decide el status y registra la
//! falla en el log.

use super::id::IdGenerator;
use super::model::{ArticuloDraft, ArticuloPatch, ValidationError};
use crate::http::{Response, StatusCode};
use crate::store::{RecordStore, StoreError};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Errores de las operaciones sobre articulos
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body válido como JSON pero que no cumple el esquema mínimo
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Body que no es JSON
    #[error("Invalid JSON body: {0}")]
    MalformedBody(#[source] serde_json::Error),

    /// No hay articulo con ese id (solo en PUT)
    #[error("Articulo no encontrado: {0}")]
    NotFound(String),

    /// Falla del store
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Status HTTP para este error.
    ///
    /// Con `legacy_validation` las fallas de validación salen como 500.
    pub fn status(&self, legacy_validation: bool) -> StatusCode {
        match self {
            ApiError::Validation(_) if legacy_validation => StatusCode::InternalServerError,
            ApiError::Validation(_) | ApiError::MalformedBody(_) => StatusCode::BadRequest,
            ApiError::NotFound(_) => StatusCode::NotFound,
            ApiError::Store(_) => StatusCode::InternalServerError,
        }
    }
}

/// Recurso `/articulos`: store + generador de ids inyectados
pub struct ArticuloResource {
    store: Arc<dyn RecordStore>,
    ids: Arc<dyn IdGenerator>,
    legacy_validation_errors: bool,
}

impl ArticuloResource {
    pub fn new(store: Arc<dyn RecordStore>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            store,
            ids,
            legacy_validation_errors: false,
        }
    }

    /// Reporta las fallas de validación como 500 en vez de 400
    pub fn with_legacy_validation_errors(mut self, enabled: bool) -> Self {
        self.legacy_validation_errors = enabled;
        self
    }

    /// `GET /articulos`
    pub fn list(&self) -> Response {
        self.respond("list", self.try_list())
    }

    /// `GET /articulos/{id}`
    pub fn get(&self, id: &str) -> Response {
        self.respond("get", self.try_get(id))
    }

    /// `POST /articulos`
    pub fn create(&self, body: &[u8]) -> Response {
        self.respond("create", self.try_create(body))
    }

    /// `PUT /articulos/{id}`
    pub fn update(&self, id: &str, body: &[u8]) -> Response {
        self.respond("update", self.try_update(id, body))
    }

    /// `DELETE /articulos/{id}`
    pub fn delete(&self, id: &str) -> Response {
        self.respond("delete", self.try_delete(id))
    }

    fn try_list(&self) -> Result<Response, ApiError> {
        let articulos = self.store.all()?;
        Ok(Response::json(StatusCode::Ok, &articulos))
    }

    fn try_get(&self, id: &str) -> Result<Response, ApiError> {
        Ok(match self.store.find(id)? {
            Some(articulo) => Response::json(StatusCode::Ok, &articulo),
            None => Response::empty(StatusCode::NotFound),
        })
    }

    fn try_create(&self, body: &[u8]) -> Result<Response, ApiError> {
        let draft = ArticuloDraft::from_body(parse_body(body)?)?;
        let articulo = draft.into_articulo(self.ids.generate());

        self.store.push(articulo.clone())?;
        log::info!(
            "event=articulo_created id={}",
            articulo.id().unwrap_or_default()
        );

        Ok(Response::json(StatusCode::Ok, &articulo))
    }

    fn try_update(&self, id: &str, body: &[u8]) -> Result<Response, ApiError> {
        let patch = ArticuloPatch::from_body(parse_body(body)?)?;

        if self.store.assign(id, &patch)?.is_none() {
            return Err(ApiError::NotFound(id.to_string()));
        }
        log::info!("event=articulo_updated id={}", id);

        // Se responde con lo que quedó en el store, no con el merge local
        match self.store.find(id)? {
            Some(articulo) => Ok(Response::json(StatusCode::Ok, &articulo)),
            None => Err(ApiError::NotFound(id.to_string())),
        }
    }

    fn try_delete(&self, id: &str) -> Result<Response, ApiError> {
        let removed = self.store.remove(id)?;
        log::info!(
            "event=articulo_deleted id={} existed={}",
            id,
            removed.is_some()
        );
        Ok(Response::empty(StatusCode::Ok))
    }

    /// Punto único de mapeo de errores a respuestas
    fn respond(&self, operation: &str, result: Result<Response, ApiError>) -> Response {
        match result {
            Ok(response) => response,
            Err(err) => {
                let status = err.status(self.legacy_validation_errors);
                match &err {
                    ApiError::Store(_) => log::error!(
                        "event=store_fault operation={} status={} error={}",
                        operation,
                        status.as_u16(),
                        err
                    ),
                    _ => log::warn!(
                        "event=request_rejected operation={} status={} error={}",
                        operation,
                        status.as_u16(),
                        err
                    ),
                }
                Response::error(status, &err.to_string())
            }
        }
    }
}

/// Interpreta el body como JSON. Un body vacío equivale a `{}`.
fn parse_body(body: &[u8]) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_slice(body).map_err(ApiError::MalformedBody)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::articulos::Articulo;
    use crate::store::MemoryStore;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Generador determinista: "id0001", "id0002", ...
    struct SequentialIds(AtomicUsize);

    impl IdGenerator for SequentialIds {
        fn generate(&self) -> String {
            format!("id{:04}", self.0.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }

    fn resource_with(store: Arc<MemoryStore>) -> ArticuloResource {
        ArticuloResource::new(store, Arc::new(SequentialIds(AtomicUsize::new(0))))
    }

    fn body_json(response: &Response) -> Value {
        serde_json::from_slice(response.body()).unwrap()
    }

    fn leche() -> Articulo {
        Articulo::new(
            "Gis123".to_string(),
            json!({"nombre": "Leche", "marca": "Gloria", "precio": 1, "disponibilidad": "Si"})
                .as_object()
                .cloned()
                .unwrap(),
        )
    }

    // ==================== List ====================

    #[test]
    fn test_list_empty() {
        let resource = resource_with(Arc::new(MemoryStore::new()));
        let response = resource.list();

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(body_json(&response), json!([]));
    }

    #[test]
    fn test_list_in_storage_order() {
        let second = Articulo::new("b".into(), json!({"nombre": "Pan"}).as_object().cloned().unwrap());
        let store = Arc::new(MemoryStore::with_articulos(vec![leche(), second]));
        let response = resource_with(store).list();

        let body = body_json(&response);
        assert_eq!(body[0]["id"], "Gis123");
        assert_eq!(body[1]["id"], "b");
    }

    #[test]
    fn test_list_store_fault_is_500() {
        let store = Arc::new(MemoryStore::new());
        store.set_failing(true);

        let response = resource_with(store).list();
        assert_eq!(response.status(), StatusCode::InternalServerError);
        assert!(body_json(&response)["error"].is_string());
    }

    // ==================== Get ====================

    #[test]
    fn test_get_found() {
        let store = Arc::new(MemoryStore::with_articulos(vec![leche()]));
        let response = resource_with(store).get("Gis123");

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(body_json(&response), serde_json::to_value(leche()).unwrap());
    }

    #[test]
    fn test_get_not_found_has_empty_body() {
        let response = resource_with(Arc::new(MemoryStore::new())).get("nope");

        assert_eq!(response.status(), StatusCode::NotFound);
        assert!(response.body().is_empty());
    }

    // ==================== Create ====================

    #[test]
    fn test_create_assigns_id_and_persists() {
        let store = Arc::new(MemoryStore::new());
        let resource = resource_with(Arc::clone(&store));

        let response = resource.create(
            br#"{"nombre":"Leche","marca":"Gloria","precio":1,"disponibilidad":"Si"}"#,
        );

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(
            body_json(&response),
            json!({"id": "id0001", "nombre": "Leche", "marca": "Gloria", "precio": 1, "disponibilidad": "Si"})
        );
        assert_eq!(store.writes(), 1);
        assert!(store.find("id0001").unwrap().is_some());
    }

    #[test]
    fn test_create_ignores_caller_id() {
        let resource = resource_with(Arc::new(MemoryStore::new()));
        let response = resource.create(br#"{"id":"hack","nombre":"Leche"}"#);

        assert_eq!(body_json(&response)["id"], "id0001");
    }

    #[test]
    fn test_create_keeps_extra_fields() {
        let resource = resource_with(Arc::new(MemoryStore::new()));
        let response = resource.create(br#"{"nombre":"Leche","lote":{"n":7},"tags":["a"]}"#);

        let body = body_json(&response);
        assert_eq!(body["lote"], json!({"n": 7}));
        assert_eq!(body["tags"], json!(["a"]));
    }

    #[test]
    fn test_create_without_nombre_is_400() {
        let store = Arc::new(MemoryStore::new());
        let resource = resource_with(Arc::clone(&store));

        for body in [&br#"{"marca":"Gloria"}"#[..], br#"{"nombre":""}"#, b"", b"[]"] {
            let response = resource.create(body);
            assert_eq!(response.status(), StatusCode::BadRequest);
            assert_eq!(body_json(&response)["error"], "No se ingreso Nombre");
        }
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_create_without_nombre_legacy_is_500() {
        let resource =
            resource_with(Arc::new(MemoryStore::new())).with_legacy_validation_errors(true);

        let response = resource.create(br#"{"nombre":null}"#);
        assert_eq!(response.status(), StatusCode::InternalServerError);
    }

    #[test]
    fn test_create_malformed_json_is_400() {
        let response = resource_with(Arc::new(MemoryStore::new())).create(b"{nombre:");

        assert_eq!(response.status(), StatusCode::BadRequest);
        let message = body_json(&response)["error"].as_str().unwrap().to_string();
        assert!(message.starts_with("Invalid JSON body"));
    }

    #[test]
    fn test_create_store_fault_is_500() {
        let store = Arc::new(MemoryStore::new());
        store.set_failing(true);

        let response = resource_with(store).create(br#"{"nombre":"Leche"}"#);
        assert_eq!(response.status(), StatusCode::InternalServerError);
    }

    // ==================== Update ====================

    #[test]
    fn test_update_merges_fields() {
        let store = Arc::new(MemoryStore::with_articulos(vec![leche()]));
        let response = resource_with(store).update("Gis123", br#"{"marca":"X"}"#);

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(
            body_json(&response),
            json!({"id": "Gis123", "nombre": "Leche", "marca": "X", "precio": 1, "disponibilidad": "Si"})
        );
    }

    #[test]
    fn test_update_cannot_change_id() {
        let store = Arc::new(MemoryStore::with_articulos(vec![leche()]));
        let resource = resource_with(Arc::clone(&store));

        let response = resource.update("Gis123", br#"{"id":"otro","color":"Celeste"}"#);

        assert_eq!(body_json(&response)["id"], "Gis123");
        assert!(store.find("otro").unwrap().is_none());
    }

    #[test]
    fn test_update_missing_is_404() {
        let response = resource_with(Arc::new(MemoryStore::new())).update("nope", br#"{"marca":"X"}"#);

        assert_eq!(response.status(), StatusCode::NotFound);
        assert_eq!(body_json(&response)["error"], "Articulo no encontrado: nope");
    }

    #[test]
    fn test_update_non_object_is_400() {
        let store = Arc::new(MemoryStore::with_articulos(vec![leche()]));
        let response = resource_with(store).update("Gis123", b"[1,2]");

        assert_eq!(response.status(), StatusCode::BadRequest);
    }

    #[test]
    fn test_update_store_fault_is_500() {
        let store = Arc::new(MemoryStore::with_articulos(vec![leche()]));
        store.set_failing(true);

        let response = resource_with(store).update("Gis123", br#"{"marca":"X"}"#);
        assert_eq!(response.status(), StatusCode::InternalServerError);
    }

    // ==================== Delete ====================

    #[test]
    fn test_delete_existing() {
        let store = Arc::new(MemoryStore::with_articulos(vec![leche()]));
        let resource = resource_with(Arc::clone(&store));

        let response = resource.delete("Gis123");

        assert_eq!(response.status(), StatusCode::Ok);
        assert!(response.body().is_empty());
        assert_eq!(resource.get("Gis123").status(), StatusCode::NotFound);
    }

    #[test]
    fn test_delete_missing_is_still_200() {
        let store = Arc::new(MemoryStore::new());
        let response = resource_with(Arc::clone(&store)).delete("nope");

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(store.writes(), 0);
    }

    // ==================== Error mapping ====================

    #[test]
    fn test_error_status_mapping() {
        let validation = ApiError::from(ValidationError::MissingNombre);
        assert_eq!(validation.status(false), StatusCode::BadRequest);
        assert_eq!(validation.status(true), StatusCode::InternalServerError);

        let not_found = ApiError::NotFound("x".into());
        assert_eq!(not_found.status(true), StatusCode::NotFound);

        let store = ApiError::from(StoreError::Poisoned);
        assert_eq!(store.status(false), StatusCode::InternalServerError);
    }
}
