//! Documento OpenAPI 3.0 del recurso, servido en `GET /api-docs`.

use serde_json::{json, Value};

pub fn openapi_document() -> Value {
    let articulo_ref = json!({ "$ref": "#/components/schemas/Articulos" });
    let error_ref = json!({ "$ref": "#/components/schemas/Error" });
    let id_param = json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "string" },
        "description": "ID autogenerado (NanoId)"
    });

    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "API de Articulos",
            "version": env!("CARGO_PKG_VERSION")
        },
        "paths": {
            "/articulos": {
                "get": {
                    "summary": "Devuelve la lista de articulos",
                    "tags": ["Articulos"],
                    "responses": {
                        "200": {
                            "description": "Lista de los Articulos",
                            "content": { "application/json": { "schema": { "type": "array", "items": articulo_ref } } }
                        }
                    }
                },
                "post": {
                    "summary": "Registra un articulo",
                    "tags": ["Articulos"],
                    "requestBody": { "content": { "application/json": { "schema": articulo_ref } } },
                    "responses": {
                        "200": { "description": "Articulo registrado", "content": { "application/json": { "schema": articulo_ref } } },
                        "400": { "description": "Falta el nombre o el JSON es inválido", "content": { "application/json": { "schema": error_ref } } },
                        "500": { "description": "Error interno del servidor", "content": { "application/json": { "schema": error_ref } } }
                    }
                }
            },
            "/articulos/{id}": {
                "get": {
                    "summary": "Devuelve un articulo",
                    "tags": ["Articulos"],
                    "parameters": [id_param],
                    "responses": {
                        "200": { "description": "Exito al obtener un articulo", "content": { "application/json": { "schema": articulo_ref } } },
                        "404": { "description": "No se encontro el articulo" }
                    }
                },
                "put": {
                    "summary": "Actualiza campos de un articulo",
                    "tags": ["Articulos"],
                    "parameters": [id_param],
                    "requestBody": { "content": { "application/json": { "schema": { "type": "object" } } } },
                    "responses": {
                        "200": { "description": "Articulo actualizado", "content": { "application/json": { "schema": articulo_ref } } },
                        "404": { "description": "No se encontro el articulo", "content": { "application/json": { "schema": error_ref } } },
                        "500": { "description": "Error interno del servidor", "content": { "application/json": { "schema": error_ref } } }
                    }
                },
                "delete": {
                    "summary": "Elimina un articulo",
                    "tags": ["Articulos"],
                    "parameters": [id_param],
                    "responses": {
                        "200": { "description": "Articulo eliminado (o inexistente)" }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Articulos": {
                    "type": "object",
                    "required": ["id", "nombre", "marca", "precio", "disponibilidad"],
                    "properties": {
                        "id": { "type": "string", "description": "ID autogenerado (NanoId)" },
                        "nombre": { "type": "string" },
                        "marca": { "type": "string" },
                        "precio": { "type": "number" },
                        "tamanio": { "type": "integer" },
                        "color": { "type": "string" },
                        "peso": { "type": "number" },
                        "disponibilidad": { "type": "string" }
                    },
                    "example": {
                        "id": "Gis123",
                        "nombre": "Leche",
                        "marca": "Gloria",
                        "precio": 1,
                        "tamanio": 8,
                        "color": "Celeste",
                        "peso": 30,
                        "disponibilidad": "Si"
                    }
                },
                "Error": {
                    "type": "object",
                    "properties": { "error": { "type": "string" } }
                }
            }
        }
    })
}
