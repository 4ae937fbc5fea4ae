//! # Modelo de Articulo
//! src/articulos/model.rs
//!
//! Un articulo es un objeto JSON abierto: `id`, `nombre`, `marca`, `precio`,
//! `disponibilidad` y opcionalmente `tamanio`, `color`, `peso`. Cualquier
//! otro campo que mande el cliente se guarda tal cual, en el mismo orden.
//!
//! ```json
//! {"id": "Gis123", "nombre": "Leche", "marca": "Gloria", "precio": 1,
//!  "tamanio": 8, "color": "Celeste", "peso": 30, "disponibilidad": "Si"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Clave del identificador dentro del objeto
pub const ID_FIELD: &str = "id";

/// Único campo validado al crear
pub const NOMBRE_FIELD: &str = "nombre";

/// Errores de validación del body
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// `nombre` ausente o "falsy" (null, false, 0, "")
    #[error("No se ingreso Nombre")]
    MissingNombre,

    /// El body es JSON válido pero no un objeto
    #[error("Request body must be a JSON object")]
    NotAnObject,
}

/// Registro persistido en la colección `articulos`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Articulo(Map<String, Value>);

impl Articulo {
    /// Construye un articulo con `id` como primer campo.
    ///
    /// Un `id` presente en `fields` se descarta: el generado siempre gana.
    pub fn new(id: String, fields: Map<String, Value>) -> Self {
        let mut record = Map::with_capacity(fields.len() + 1);
        record.insert(ID_FIELD.to_string(), Value::String(id));
        for (key, value) in fields {
            if key != ID_FIELD {
                record.insert(key, value);
            }
        }
        Self(record)
    }

    /// Id del articulo. `None` si el documento en disco trae un registro sin
    /// id o con un id que no es string.
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(Value::as_str)
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.id() == Some(id)
    }

    /// Obtiene un campo cualquiera
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Merge superficial: agrega claves nuevas y sobrescribe las existentes.
    /// Nunca elimina campos ni toca el `id`.
    ///
    /// ```
    /// use articulos_server::articulos::{Articulo, ArticuloPatch};
    /// use serde_json::json;
    ///
    /// let fields = json!({"nombre": "Leche", "marca": "Gloria"});
    /// let mut articulo = Articulo::new("abc123".into(), fields.as_object().unwrap().clone());
    ///
    /// let patch = ArticuloPatch::from_body(json!({"marca": "X", "id": "otro"})).unwrap();
    /// articulo.merge(&patch);
    ///
    /// assert_eq!(articulo.id(), Some("abc123"));
    /// assert_eq!(articulo.get("marca"), Some(&json!("X")));
    /// assert_eq!(articulo.get("nombre"), Some(&json!("Leche")));
    /// ```
    pub fn merge(&mut self, patch: &ArticuloPatch) {
        for (key, value) in &patch.0 {
            if key != ID_FIELD {
                self.0.insert(key.clone(), value.clone());
            }
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Body de un `POST /articulos` ya validado
#[derive(Debug, Clone, PartialEq)]
pub struct ArticuloDraft(Map<String, Value>);

impl ArticuloDraft {
    /// Valida el body de creación: debe ser un objeto con `nombre` "truthy".
    pub fn from_body(body: Value) -> Result<Self, ValidationError> {
        let Value::Object(fields) = body else {
            return Err(ValidationError::MissingNombre);
        };

        match fields.get(NOMBRE_FIELD) {
            Some(nombre) if is_truthy(nombre) => Ok(Self(fields)),
            _ => Err(ValidationError::MissingNombre),
        }
    }

    /// Asigna el id generado y produce el registro final
    pub fn into_articulo(self, id: String) -> Articulo {
        Articulo::new(id, self.0)
    }
}

/// Body de un `PUT /articulos/{id}`: campos a mezclar
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArticuloPatch(Map<String, Value>);

impl ArticuloPatch {
    pub fn from_body(body: Value) -> Result<Self, ValidationError> {
        match body {
            Value::Object(fields) => Ok(Self(fields)),
            _ => Err(ValidationError::NotAnObject),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Semántica de "truthiness" de JSON tal como la entiende un cliente web:
/// `null`, `false`, `0`, `NaN` y `""` son falsos; objetos y arrays son
/// verdaderos aunque estén vacíos.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_new_puts_generated_id_first() {
        let articulo = Articulo::new(
            "abc123".to_string(),
            fields(json!({"nombre": "Leche", "id": "caller", "precio": 1})),
        );

        assert_eq!(articulo.id(), Some("abc123"));
        let keys: Vec<&String> = articulo.fields().keys().collect();
        assert_eq!(keys, vec!["id", "nombre", "precio"]);
    }

    #[test]
    fn test_id_missing_or_not_string() {
        let articulo: Articulo = serde_json::from_value(json!({"nombre": "x"})).unwrap();
        assert_eq!(articulo.id(), None);

        let articulo: Articulo = serde_json::from_value(json!({"id": 7})).unwrap();
        assert_eq!(articulo.id(), None);
        assert!(!articulo.has_id("7"));
    }

    #[test]
    fn test_serde_is_transparent() {
        let articulo = Articulo::new("abc123".to_string(), fields(json!({"nombre": "Leche"})));
        let value = serde_json::to_value(&articulo).unwrap();

        assert_eq!(value, json!({"id": "abc123", "nombre": "Leche"}));
    }

    #[test]
    fn test_merge_adds_and_overwrites_but_never_removes() {
        let mut articulo = Articulo::new(
            "abc123".to_string(),
            fields(json!({"nombre": "Leche", "marca": "Gloria", "precio": 1})),
        );
        let patch = ArticuloPatch::from_body(json!({"marca": "X", "color": "Celeste"})).unwrap();

        articulo.merge(&patch);

        assert_eq!(
            serde_json::to_value(&articulo).unwrap(),
            json!({"id": "abc123", "nombre": "Leche", "marca": "X", "precio": 1, "color": "Celeste"})
        );
    }

    #[test]
    fn test_draft_requires_truthy_nombre() {
        assert!(ArticuloDraft::from_body(json!({"nombre": "Leche"})).is_ok());

        for body in [
            json!({}),
            json!({"nombre": null}),
            json!({"nombre": ""}),
            json!({"nombre": false}),
            json!({"nombre": 0}),
            json!({"marca": "Gloria"}),
            json!([{"nombre": "Leche"}]),
            json!("Leche"),
        ] {
            assert_eq!(
                ArticuloDraft::from_body(body.clone()),
                Err(ValidationError::MissingNombre),
                "body {} should be rejected",
                body
            );
        }
    }

    #[test]
    fn test_draft_into_articulo_overwrites_caller_id() {
        let draft = ArticuloDraft::from_body(json!({"id": "mine", "nombre": "Leche"})).unwrap();
        let articulo = draft.into_articulo("gen123".to_string());

        assert_eq!(articulo.id(), Some("gen123"));
    }

    #[test]
    fn test_patch_requires_object() {
        assert!(ArticuloPatch::from_body(json!({})).unwrap().is_empty());
        assert_eq!(
            ArticuloPatch::from_body(json!([1, 2])),
            Err(ValidationError::NotAnObject)
        );
        assert_eq!(
            ArticuloPatch::from_body(Value::Null),
            Err(ValidationError::NotAnObject)
        );
    }

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy(&json!("a")));
        assert!(is_truthy(&json!(1.5)));
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));

        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&Value::Null));
    }
}
