//! # Requests HTTP
//! src/http/request.rs
//!
//! Representación de un request ya parseado. El parsing en sí vive en
//! [`super::parser`], que construye un `Request` directamente desde el socket.
//!
//! ## Formato de un Request
//!
//! ```text
//! POST /echo?raw=1 HTTP/1.1\r\n
//! Host: localhost:8088\r\n
//! Content-Length: 5\r\n
//! \r\n
//! hello
//! ```
//!
//! El path se guarda tal cual llega (con query string incluida).

use super::{HeaderStore, ParserLimits, RequestParser};
use crate::error::ParseError;
use std::net::{IpAddr, SocketAddr};

/// Representa un request HTTP parseado
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// Método HTTP tal como llegó (ej: "GET")
    pub(crate) method: String,

    /// Path crudo de la petición (ej: "/test?x=1")
    pub(crate) path: String,

    /// Versión declarada en la request line, si la hay
    pub(crate) version: Option<String>,

    pub(crate) headers: HeaderStore,

    /// Body de longitud `Content-Length` (vacío si no hay header)
    pub(crate) body: Vec<u8>,

    /// Dirección del cliente
    pub(crate) peer: Option<SocketAddr>,
}

impl Request {
    /// Parsea un request desde un buffer en memoria con los límites por defecto
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use pool_http::http::Request;
    ///
    /// let raw = b"GET /test HTTP/1.1\r\nHost: x\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.path(), "/test");
    /// assert_eq!(request.header("Host"), "x");
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        RequestParser::new(buffer, ParserLimits::default()).parse()
    }

    /// Asocia la dirección del cliente al request
    pub fn with_peer(mut self, peer: SocketAddr) -> Self {
        self.peer = Some(peer);
        self
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Obtiene el path del request
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Obtiene un header específico, o `""` si no existe
    pub fn header(&self, name: &str) -> &str {
        self.headers.get_or_empty(name)
    }

    /// Obtiene todos los headers
    pub fn headers(&self) -> &HeaderStore {
        &self.headers
    }

    /// Obtiene el body del request
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Obtiene el body del request como String
    pub fn body_string(&self) -> Option<String> {
        String::from_utf8(self.body.clone()).ok()
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer
    }

    pub fn remote_addr(&self) -> Option<IpAddr> {
        self.peer.map(|addr| addr.ip())
    }

    pub fn remote_port(&self) -> Option<u16> {
        self.peer.map(|addr| addr.port())
    }

    /// `"ip:port"` del cliente, o `"unknown"`
    pub fn remote_host(&self) -> String {
        self.peer
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}
