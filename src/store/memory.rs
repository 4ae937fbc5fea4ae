//! Store en memoria, sin disco. Útil para tests de handlers.

use super::{Document, RecordStore, StoreError, StoreResult};
use crate::articulos::{Articulo, ArticuloPatch};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
pub struct MemoryStore {
    document: Mutex<Document>,
    /// Cantidad de "persistencias" realizadas
    writes: AtomicU64,
    /// Si está activo, toda operación falla como si el disco no respondiera
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store precargado con `articulos`
    pub fn with_articulos(articulos: Vec<Articulo>) -> Self {
        let store = Self::new();
        if let Ok(mut document) = store.document.lock() {
            document.articulos = articulos;
        }
        store
    }

    /// Simula una falla de almacenamiento en las próximas operaciones
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Document>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Io {
                path: "<memory>".into(),
                source: std::io::Error::other("simulated storage failure"),
            });
        }
        self.document.lock().map_err(|_| StoreError::Poisoned)
    }

    fn mutate<T>(&self, f: impl FnOnce(&mut Document) -> T) -> StoreResult<T> {
        let mut document = self.lock()?;
        let result = f(&mut document);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(result)
    }

    /// Sin coincidencia no cuenta como escritura
    fn mutate_matching<T>(&self, f: impl FnOnce(&mut Document) -> Option<T>) -> StoreResult<Option<T>> {
        let mut document = self.lock()?;
        let result = f(&mut document);
        if result.is_some() {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(result)
    }
}

impl RecordStore for MemoryStore {
    fn all(&self) -> StoreResult<Vec<Articulo>> {
        Ok(self.lock()?.articulos.clone())
    }

    fn find(&self, id: &str) -> StoreResult<Option<Articulo>> {
        Ok(self.lock()?.find(id).cloned())
    }

    fn push(&self, articulo: Articulo) -> StoreResult<()> {
        self.mutate(|doc| doc.push(articulo))
    }

    fn assign(&self, id: &str, patch: &ArticuloPatch) -> StoreResult<Option<Articulo>> {
        self.mutate_matching(|doc| doc.assign(id, patch))
    }

    fn remove(&self, id: &str) -> StoreResult<Option<Articulo>> {
        self.mutate_matching(|doc| doc.remove(id))
    }
}
