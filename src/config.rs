//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor de articulos con soporte para argumentos CLI
//! y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./articulos_server --port 8080 \
//!   --db-path ./data/db.json \
//!   --log-level debug
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 DB_PATH=/var/lib/articulos/db.json ./articulos_server
//! ```

use clap::Parser;

/// Niveles de log aceptados por `--log-level`
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuración del servidor de articulos
#[derive(Debug, Clone, Parser)]
#[command(name = "articulos_server")]
#[command(about = "Servidor HTTP/1.0 con API REST de articulos persistida en JSON")]
#[command(version)]
pub struct Config {
    /// Puerto en el que escucha el servidor (0 = puerto efímero)
    #[arg(short, long, default_value = "8080", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Archivo JSON donde se persisten los articulos
    #[arg(long = "db-path", default_value = "./data/db.json", env = "DB_PATH")]
    pub db_path: String,

    /// Nivel de log (trace, debug, info, warn, error)
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,

    // === Límites ===

    /// Tamaño máximo del body de un request en bytes
    #[arg(long = "max-body-bytes", default_value = "102400", env = "MAX_BODY_BYTES")]
    pub max_body_bytes: usize,

    /// Timeout de lectura del socket en milisegundos
    #[arg(long = "read-timeout-ms", default_value = "30000", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    // === Compatibilidad ===

    /// Responde 500 (en vez de 400) cuando falta `nombre` al crear
    #[arg(long = "legacy-validation-errors", env = "LEGACY_VALIDATION_ERRORS")]
    pub legacy_validation_errors: bool,
}

impl Config {
    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use articulos_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }
        if self.db_path.trim().is_empty() {
            return Err("DB path must not be empty".to_string());
        }

        let level = self.log_level.trim().to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) && level != "warning" {
            return Err(format!(
                "Log level `{}` is not supported; expected {}",
                self.log_level,
                LOG_LEVELS.join("|")
            ));
        }

        if self.max_body_bytes == 0 {
            return Err("Max body bytes must be >= 1".to_string());
        }
        if self.read_timeout_ms == 0 {
            return Err("Read timeout must be > 0".to_string());
        }

        Ok(())
    }

    /// Registra un resumen de la configuración efectiva
    pub fn log_summary(&self) {
        log::info!(
            "event=config address={} db_path={} log_level={}",
            self.address(),
            self.db_path,
            self.log_level
        );
        log::info!(
            "event=config max_body_bytes={} read_timeout_ms={} legacy_validation_errors={}",
            self.max_body_bytes,
            self.read_timeout_ms,
            self.legacy_validation_errors
        );
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            db_path: "./data/db.json".to_string(),
            log_level: "info".to_string(),
            max_body_bytes: 102_400,
            read_timeout_ms: 30_000,
            legacy_validation_errors: false,
        }
    }
}
