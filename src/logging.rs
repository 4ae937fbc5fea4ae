//! # Logging
//! src/logging.rs
//!
//! Inicialización del logger del proceso (`log` + `flexi_logger` a stderr).
//!
//! - Se inicializa una sola vez por proceso.
//! - Repetir con el mismo nivel es idempotente; con otro nivel se rechaza.
//! - Nunca hace panic.

use flexi_logger::{Logger, LoggerHandle};
use std::sync::OnceLock;
use std::time::Duration;

/// Reintentos (1 ms c/u) al esperar el estado de otro thread
const STATE_WAIT_ATTEMPTS: usize = 100;

static LOGGING_STATE: OnceLock<LoggingState> = OnceLock::new();

struct LoggingState {
    level: &'static str,
    _logger: LoggerHandle,
}

/// Inicializa el logger con el nivel indicado
///
/// Retorna un mensaje legible si el nivel es inválido, si el backend no
/// arranca o si ya estaba inicializado con otro nivel.
pub fn init_logging(level: &str) -> Result<(), String> {
    let level = normalize_level(level)?;

    if let Some(state) = LOGGING_STATE.get() {
        return check_same_level(state, level);
    }

    let started = Logger::try_with_str(level)
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?
        .log_to_stderr()
        .format(flexi_logger::detailed_format)
        .start();

    let logger = match started {
        Ok(logger) => logger,
        Err(err) => {
            // Otro thread pudo instalar el logger global entre el chequeo y `start()`
            return match wait_for_state() {
                Some(state) => check_same_level(state, level),
                None => Err(format!("failed to start logger: {err}")),
            };
        }
    };

    // Si otro thread ganó la carrera, su estado manda
    let state = LOGGING_STATE.get_or_init(|| LoggingState {
        level,
        _logger: logger,
    });
    check_same_level(state, level)?;

    log::info!(
        "event=logging_init status=ok level={} version={}",
        level,
        env!("CARGO_PKG_VERSION")
    );
    Ok(())
}

/// Nivel activo, o `None` si el logger no está inicializado
pub fn active_level() -> Option<&'static str> {
    LOGGING_STATE.get().map(|state| state.level)
}

/// Estado publicado por el thread que ganó la carrera de inicialización.
///
/// El ganador instala el logger global antes de publicar su estado, así que
/// se espera un poco a que aparezca.
fn wait_for_state() -> Option<&'static LoggingState> {
    for _ in 0..STATE_WAIT_ATTEMPTS {
        if let Some(state) = LOGGING_STATE.get() {
            return Some(state);
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    LOGGING_STATE.get()
}

fn check_same_level(state: &LoggingState, level: &str) -> Result<(), String> {
    if state.level != level {
        return Err(format!(
            "logging already initialized with level `{}`; refusing to switch to `{}`",
            state.level, level
        ));
    }
    Ok(())
}

pub(crate) fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_level() {
        assert_eq!(normalize_level(" INFO ").unwrap(), "info");
        assert_eq!(normalize_level("warning").unwrap(), "warn");
        assert!(normalize_level("verbose").unwrap_err().contains("verbose"));
    }

    #[test]
    fn test_init_logging_is_idempotent_and_rejects_switch() {
        // Todos los tests que inicializan el logger usan "debug"
        init_logging("debug").unwrap();
        init_logging("DEBUG").unwrap();
        assert_eq!(active_level(), Some("debug"));

        let err = init_logging("error").unwrap_err();
        assert!(err.contains("refusing to switch"));
    }

    #[test]
    fn test_concurrent_init_same_level_is_idempotent() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| init_logging("debug")))
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), Ok(()));
        }
        assert_eq!(active_level(), Some("debug"));
    }

    #[test]
    fn test_init_logging_invalid_level() {
        assert!(init_logging("loud").is_err());
    }
}
