//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones entrantes y las encola en el pool de workers
//! 3. Cada worker lee y parsea un request, lo despacha y escribe la respuesta
//! 4. Cierra la conexión

pub mod connection;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use connection::Connection;
pub use tcp::{Server, ShutdownHandle, DEFAULT_HOST};
