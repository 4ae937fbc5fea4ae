//! # Articulos Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor HTTP/1.0 de articulos.
//!
//! La configuración viene de argumentos CLI con fallback a variables de
//! entorno (ver `config.rs`).

use articulos_server::config::Config;
use articulos_server::logging;
use articulos_server::server::Server;
use clap::Parser;

fn main() {
    let config = Config::parse();

    if let Err(e) = config.validate() {
        eprintln!("Configuración inválida: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = logging::init_logging(&config.log_level) {
        eprintln!("No se pudo inicializar el logging: {}", e);
        std::process::exit(1);
    }

    config.log_summary();

    // Abre (o crea) el documento JSON y registra las rutas
    let mut server = match Server::new(config) {
        Ok(server) => server,
        Err(e) => {
            log::error!("event=startup_failed status=error error={}", e);
            std::process::exit(1);
        }
    };

    // Esto bloquea el thread principal
    if let Err(e) = server.run() {
        log::error!("event=server_stopped status=error error={}", e);
        std::process::exit(1);
    }
}
