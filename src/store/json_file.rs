//! # Persistencia en Archivo JSON
//! src/store/json_file.rs
//!
//! Mantiene el documento en memoria y lo reescribe completo en cada
//! mutación (archivo temporal + rename).

use super::{Document, RecordStore, StoreError, StoreResult};
use crate::articulos::{Articulo, ArticuloPatch};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Store respaldado por un archivo JSON
pub struct JsonFileStore {
    /// Ruta al documento
    path: PathBuf,

    /// Copia en memoria del documento
    document: Mutex<Document>,
}

impl JsonFileStore {
    /// Abre el documento en `path`.
    ///
    /// Si el archivo no existe (o está vacío) se crea con
    /// `{"articulos": []}`. Un archivo con JSON inválido es un error: no se
    /// sobrescribe.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let (document, fresh) = match Self::load_from_file(&path)? {
            Some(document) => (document, false),
            None => (Document::default(), true),
        };

        if fresh {
            Self::save_to_file(&path, &document)?;
            log::info!("event=store_created path={}", path.display());
        } else {
            log::info!(
                "event=store_opened path={} articulos={}",
                path.display(),
                document.articulos.len()
            );
        }

        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    /// Ruta del documento
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Carga el documento. `None` si el archivo no existe o está vacío.
    fn load_from_file(path: &Path) -> StoreResult<Option<Document>> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        if contents.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Guarda el documento completo
    fn save_to_file(path: &Path, document: &Document) -> StoreResult<()> {
        let io_err = |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };

        // Crear archivo temporal primero (atomic write)
        let mut temp_path = path.as_os_str().to_owned();
        temp_path.push(".tmp");
        let temp_path = PathBuf::from(temp_path);

        let file = File::create(&temp_path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, document)?;
        writer.flush().map_err(io_err)?;

        // Renombrar (atómico en sistemas Unix)
        fs::rename(&temp_path, path).map_err(io_err)?;

        Ok(())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Document>> {
        self.document.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Aplica `f` sobre una copia, la persiste y recién ahí la publica
    fn mutate<T>(&self, f: impl FnOnce(&mut Document) -> T) -> StoreResult<T> {
        let mut document = self.lock()?;

        let mut next = document.clone();
        let result = f(&mut next);

        Self::save_to_file(&self.path, &next)?;
        *document = next;

        Ok(result)
    }

    /// Como `mutate`, pero si `f` no encuentra nada (`None`) no se escribe.
    /// La búsqueda y la escritura ocurren bajo el mismo lock.
    fn mutate_matching<T>(&self, f: impl FnOnce(&mut Document) -> Option<T>) -> StoreResult<Option<T>> {
        let mut document = self.lock()?;

        let mut next = document.clone();
        let Some(result) = f(&mut next) else {
            return Ok(None);
        };

        Self::save_to_file(&self.path, &next)?;
        *document = next;

        Ok(Some(result))
    }
}

impl RecordStore for JsonFileStore {
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
