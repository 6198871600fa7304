//! # Pool HTTP Server
//! src/lib.rs
//!
//! Servidor HTTP/1.1 mínimo sobre sockets TCP bloqueantes: un thread
//! acepta conexiones y un pool fijo de workers las atiende, un request por
//! conexión.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `pool`: Cola acotada y pool de workers
//! - `http`: Parsing de requests y serialización de responses
//! - `router`: Enrutamiento exacto `"METHOD PATH"` a handlers
//! - `server`: Listener TCP, acceptor y ciclo de cada conexión
//! - `config`: Configuración por CLI y variables de entorno
//! - `commands`: Handlers de ejemplo
//! - `error`: Tipos de error de cada capa
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use pool_http::http::{Request, Response};
//! use pool_http::server::Server;
//!
//! let mut server = Server::new();
//! server.init(Some("127.0.0.1"), 8088).unwrap();
//! server
//!     .add_route("GET", "/test", |_req: &Request, res: &mut Response| res.write("hola"))
//!     .unwrap();
//! server.start().expect("Error al iniciar servidor");
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod http;
pub mod pool;
pub mod router;
pub mod server;
