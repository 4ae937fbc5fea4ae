//! # Documento JSON
//! src/store/document.rs
//!
//! Forma del archivo en disco:
//!
//! ```json
//! {
//!   "articulos": [
//!     {"id": "Gis123", "nombre": "Leche", "marca": "Gloria", "precio": 1}
//!   ]
//! }
//! ```
//!
//! Otras colecciones de primer nivel que tenga el archivo se conservan
//! intactas al reescribirlo.

use crate::articulos::{Articulo, ArticuloPatch};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Colección de articulos, en orden de inserción
    #[serde(default)]
    pub articulos: Vec<Articulo>,

    /// Resto de claves del documento
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Document {
    /// Primer articulo cuyo `id` coincide
    pub fn find(&self, id: &str) -> Option<&Articulo> {
        self.articulos.iter().find(|a| a.has_id(id))
    }

    pub fn push(&mut self, articulo: Articulo) {
        self.articulos.push(articulo);
    }

    /// Mezcla `patch` en el primer articulo con ese `id`.
    /// Retorna el articulo resultante, o `None` si no existe.
    pub fn assign(&mut self, id: &str, patch: &ArticuloPatch) -> Option<Articulo> {
        let articulo = self.articulos.iter_mut().find(|a| a.has_id(id))?;
        articulo.merge(patch);
        Some(articulo.clone())
    }

    /// Elimina el primer articulo con ese `id`
    pub fn remove(&mut self, id: &str) -> Option<Articulo> {
        let pos = self.articulos.iter().position(|a| a.has_id(id))?;
        Some(self.articulos.remove(pos))
    }
}
