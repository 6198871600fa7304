//! # Comandos del Servidor
//!
//! Handlers de ejemplo que registra el binario:
//!
//! - `GET /test`: registra los headers del request y responde un saludo
//! - `POST /echo`: devuelve el body recibido
//! - `GET /stats`: contadores del pool en JSON
//!
//! Cada comando es una función con la firma de [`crate::router::Handler`]:
//! recibe el request y modifica la respuesta que le entrega el router.

pub mod basic;

// Re-exportar funciones útiles
pub use basic::*;
