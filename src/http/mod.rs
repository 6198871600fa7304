//! # Módulo HTTP
//!
//! Este módulo implementa el subconjunto de HTTP/1.1 que usa el servidor,
//! sin librerías de alto nivel. Incluye:
//!
//! - Parsing incremental de requests directamente desde el socket
//! - Headers ordenados con semántica `set`/`add`
//! - Construcción y serialización de responses
//! - Códigos de estado
//!
//! ## Lo que NO soporta
//!
//! - TLS
//! - `Transfer-Encoding: chunked`
//! - Keep-alive y pipelining: toda respuesta cierra la conexión
//! - Parsing de query strings: el path se entrega crudo

pub mod headers;
pub mod parser;
pub mod request;
pub mod response;
pub mod status;

// Re-exportamos los tipos principales para facilitar su uso
pub use headers::HeaderStore;
pub use parser::{ParserLimits, RequestParser};
pub use request::Request;
pub use response::Response;
pub use status::StatusCode;
