//! # Record Store
//! src/store/mod.rs
//!
//! Colección de articulos respaldada por un documento JSON. El handler HTTP
//! solo conoce el trait [`RecordStore`]; en producción se usa
//! [`JsonFileStore`] y en tests [`MemoryStore`].
//!
//! Toda operación que modifica la colección persiste el documento completo
//! antes de retornar. Si la escritura falla, la colección en memoria queda
//! como estaba.

pub mod document;
pub mod json_file;
pub mod memory;

pub use document::Document;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::articulos::{Articulo, ArticuloPatch};
use std::path::PathBuf;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Fallas del store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Error de E/S leyendo o escribiendo el documento
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// El archivo existe pero no es un documento JSON válido
    #[error("corrupt JSON document at {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No se pudo serializar el documento
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Un thread hizo panic con el lock tomado
    #[error("store lock poisoned")]
    Poisoned,
}

/// Operaciones sobre la colección `articulos`
pub trait RecordStore: Send + Sync {
    /// Colección completa, en orden de almacenamiento
    fn all(&self) -> StoreResult<Vec<Articulo>>;

    /// Primer articulo cuyo `id` coincide
    fn find(&self, id: &str) -> StoreResult<Option<Articulo>>;

    /// Agrega un articulo al final y persiste
    fn push(&self, articulo: Articulo) -> StoreResult<()>;

    /// Mezcla `patch` en el articulo con ese `id` y persiste.
    /// `Ok(None)` si no hay articulo con ese `id`.
    fn assign(&self, id: &str, patch: &ArticuloPatch) -> StoreResult<Option<Articulo>>;

    /// Elimina como máximo un articulo con ese `id` y persiste
    fn remove(&self, id: &str) -> StoreResult<Option<Articulo>>;
}
