//! # Configuración del Servidor
//! src/config.rs
//!
//! Este módulo define la configuración del servidor HTTP con soporte completo
//! para argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./pool_http --port 8080 \
//!   --workers 16 \
//!   --queue-capacity 2000 \
//!   --shutdown-mode drain
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 HTTP_HOST=0.0.0.0 WORKERS=4 ./pool_http
//! ```

use crate::http::ParserLimits;
use crate::pool::ShutdownMode;
use clap::Parser;
use serde::Serialize;

/// Configuración del servidor HTTP/1.1
#[derive(Debug, Clone, Parser, Serialize)]
#[command(name = "pool_http")]
#[command(about = "Servidor HTTP/1.1 mínimo sobre un pool fijo de workers")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8088", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    // === Pool ===

    /// Número de workers que atienden conexiones
    #[arg(short, long, default_value = "10", env = "WORKERS")]
    pub workers: usize,

    /// Capacidad máxima de la cola de conexiones pendientes
    #[arg(long = "queue-capacity", default_value = "1000", env = "QUEUE_CAPACITY")]
    pub queue_capacity: usize,

    /// Backlog del socket de escucha
    #[arg(long, default_value = "1000", env = "LISTEN_BACKLOG")]
    pub backlog: u32,

    /// Qué hacer con las conexiones encoladas al detener el servidor
    #[arg(
        long = "shutdown-mode",
        value_enum,
        default_value_t = ShutdownMode::Fast,
        env = "SHUTDOWN_MODE"
    )]
    pub shutdown_mode: ShutdownMode,

    // === Límites del parser ===

    /// Máximo de bytes de la request line
    #[arg(long = "max-request-line", default_value = "2048", env = "MAX_REQUEST_LINE")]
    pub max_request_line: usize,

    /// Máximo de caracteres del método
    #[arg(long = "max-method", default_value = "7", env = "MAX_METHOD_LEN")]
    pub max_method_len: usize,

    /// Máximo de caracteres del path
    #[arg(long = "max-path", default_value = "1024", env = "MAX_PATH_LEN")]
    pub max_path_len: usize,

    /// Máximo de bytes del bloque de headers
    #[arg(long = "max-header-bytes", default_value = "8192", env = "MAX_HEADER_BYTES")]
    pub max_header_bytes: usize,

    /// Máximo de bytes aceptados como body
    #[arg(long = "max-body-bytes", default_value = "1048576", env = "MAX_BODY_BYTES")]
    pub max_body_bytes: usize,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    ///
    /// # Ejemplo
    /// ```no_run
    /// use pool_http::config::Config;
    ///
    /// let config = Config::new();
    /// println!("Server listening on {}", config.address());
    /// ```
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use pool_http::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:8088");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        // Validar pool
        if self.workers == 0 {
            return Err("Workers must be >= 1".to_string());
        }
        if self.queue_capacity == 0 {
            return Err("Queue capacity must be >= 1".to_string());
        }
        if self.backlog == 0 {
            return Err("Listen backlog must be >= 1".to_string());
        }

        // Validar límites
        let limits = [
            ("Max request line", self.max_request_line),
            ("Max method length", self.max_method_len),
            ("Max path length", self.max_path_len),
            ("Max header bytes", self.max_header_bytes),
            ("Max body bytes", self.max_body_bytes),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(format!("{} must be >= 1", name));
            }
        }

        // Método, path y los dos espacios deben caber en la línea
        if self.max_method_len + self.max_path_len >= self.max_request_line {
            return Err(format!(
                "Max method length + max path length ({}) must be < max request line ({})",
                self.max_method_len + self.max_path_len,
                self.max_request_line
            ));
        }

        Ok(())
    }

    /// Límites que recibe el parser de cada conexión
    pub fn limits(&self) -> ParserLimits {
        ParserLimits {
            max_request_line: self.max_request_line,
            max_method_len: self.max_method_len,
            max_path_len: self.max_path_len,
            max_header_bytes: self.max_header_bytes,
            max_body_bytes: self.max_body_bytes,
        }
    }

    /// Registra un resumen de la configuración
    pub fn print_summary(&self) {
        log::info!("configuración del servidor:");
        log::info!("  address:        {}", self.address());
        log::info!("  workers:        {}", self.workers);
        log::info!("  queue capacity: {}", self.queue_capacity);
        log::info!("  backlog:        {}", self.backlog);
        log::info!("  shutdown mode:  {:?}", self.shutdown_mode);
        log::info!(
            "  límites:        line={} method={} path={} headers={} body={}",
            self.max_request_line,
            self.max_method_len,
            self.max_path_len,
            self.max_header_bytes,
            self.max_body_bytes
        );
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        let limits = ParserLimits::default();
        Self {
            port: 8088,
            host: "127.0.0.1".to_string(),
            workers: 10,
            queue_capacity: 1000,
            backlog: 1000,
            shutdown_mode: ShutdownMode::Fast,
            max_request_line: limits.max_request_line,
            max_method_len: limits.max_method_len,
            max_path_len: limits.max_path_len,
            max_header_bytes: limits.max_header_bytes,
            max_body_bytes: limits.max_body_bytes,
        }
    }
}
