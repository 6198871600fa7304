//! # Errores del Servidor
//! src/error.rs
//!
//! Taxonomía de errores del servidor, agrupada por componente:
//!
//! - [`QueueError`]: backpressure y cierre de la cola/pool
//! - [`ParseError`]: fallos del parser (todos terminales: se cierra la conexión)
//! - [`RouteError`]: errores de configuración de rutas
//! - [`ServerError`]: ciclo de vida del servidor (init, bind, start)

use std::fmt;
use std::net::SocketAddr;

/// Error al encolar o desencolar de la cola acotada.
///
/// Cuando el error viene de un `enqueue`, el item rechazado se devuelve
/// al llamador, que queda a cargo de liberarlo (por ejemplo, cerrar la
/// conexión).
#[derive(thiserror::Error)]
pub enum QueueError<T> {
    /// La cola está a capacidad máxima
    #[error("queue is full")]
    Full(T),

    /// La cola ya fue cerrada
    #[error("queue is closed")]
    Closed(T),
}

impl<T> QueueError<T> {
    /// Recupera el item rechazado
    pub fn into_inner(self) -> T {
        match self {
            QueueError::Full(item) | QueueError::Closed(item) => item,
        }
    }

    pub fn is_full(&self) -> bool {
        matches!(self, QueueError::Full(_))
    }
}

// No exigimos `T: Debug`: los work items son closures opacos.
impl<T> fmt::Debug for QueueError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueError::Full(_) => f.write_str("Full(..)"),
            QueueError::Closed(_) => f.write_str("Closed(..)"),
        }
    }
}

/// `dequeue` sobre una cola cerrada y vacía
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("queue is closed")]
pub struct QueueClosed;

/// Errores que pueden ocurrir durante el parsing de un request
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// El cliente cerró la conexión antes de enviar un request completo
    #[error("connection closed by peer before the request head was complete")]
    ConnectionClosed,

    /// La request line excede el máximo permitido sin encontrar `\r\n`
    #[error("request line exceeds {0} bytes")]
    LineTooLong(usize),

    /// Menos de dos tokens en la request line
    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),

    /// Método o path exceden su límite
    #[error("request line token too long: {0}")]
    RequestLineTooLong(&'static str),

    /// El bloque de headers excede el máximo permitido
    #[error("header block exceeds {0} bytes")]
    HeaderBlockTooLarge(usize),

    /// Content-Length negativo, no numérico o mayor al máximo
    #[error("invalid Content-Length: {0:?}")]
    InvalidContentLength(String),

    /// La conexión se cerró antes de recibir todo el body
    #[error("truncated body: expected {expected} bytes, received {received}")]
    TruncatedBody { expected: usize, received: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errores del route table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// Ya existe un handler para `"METHOD PATH"`
    #[error("route already registered: {0}")]
    DuplicateRoute(String),
}

/// Errores del ciclo de vida del servidor
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Puerto fuera del rango 1-65535
    #[error("invalid port {0}: must be between 1 and 65535")]
    InvalidPort(u32),

    /// El host no resolvió a ninguna dirección
    #[error("could not resolve an address for {0}")]
    NoAddress(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Route(#[from] RouteError),

    /// Las rutas ya fueron compartidas con los workers
    #[error("routes cannot be modified while the server is serving")]
    AlreadyServing,

    #[error("invalid configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_error_returns_item() {
        let err = QueueError::Full(42);
        assert!(err.is_full());
        assert_eq!(err.into_inner(), 42);

        let err = QueueError::Closed("conn");
        assert!(!err.is_full());
        assert_eq!(err.into_inner(), "conn");
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(QueueError::Full(()).to_string(), "queue is full");
        assert_eq!(
            ServerError::InvalidPort(0).to_string(),
            "invalid port 0: must be between 1 and 65535"
        );
        assert_eq!(
            ParseError::TruncatedBody { expected: 10, received: 3 }.to_string(),
            "truncated body: expected 10 bytes, received 3"
        );
    }

    #[test]
    fn test_route_error_into_server_error() {
        let err: ServerError = RouteError::DuplicateRoute("GET /".to_string()).into();
        assert!(matches!(err, ServerError::Route(RouteError::DuplicateRoute(_))));
    }
}
