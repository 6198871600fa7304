//! # Construcción de Respuestas HTTP
//!
//! Los handlers reciben una `Response` nueva (200, sin headers, sin body) y
//! la modifican. Al final del ciclo el servidor la serializa con
//! [`Response::to_bytes`].
//!
//! ## Formato de una respuesta
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain\r\n
//! Connection: close\r\n
//! X-Custom: abc\r\n
//! Content-Length: 5\r\n
//! \r\n
//! hello
//! ```
//!
//! `Content-Type` y `Connection` son fijos. `Content-Length` siempre se
//! recalcula desde el body real, sin importar lo que haya puesto el handler.

use super::{HeaderStore, StatusCode};

/// Representa una respuesta HTTP
#[derive(Debug, Clone, Default)]
pub struct Response {
    /// Código de estado (200 por defecto)
    status: StatusCode,

    headers: HeaderStore,

    /// Cuerpo de la respuesta (None si el handler no escribió nada)
    body: Option<Vec<u8>>,
}

impl Response {
    /// Crea una respuesta 200 sin headers ni body
    pub fn new() -> Self {
        Self::default()
    }

    /// Crea una respuesta con el código de estado especificado
    ///
    /// # Ejemplo
    /// ```
    /// use pool_http::http::{Response, StatusCode};
    ///
    /// let response = Response::with_status(StatusCode::NOT_FOUND);
    /// assert_eq!(response.status().as_u16(), 404);
    /// ```
    pub fn with_status(status: StatusCode) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn set_status(&mut self, status: impl Into<StatusCode>) {
        self.status = status.into();
    }

    /// Establece un header, sobrescribiendo el valor previo
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.set(name, value);
    }

    /// Agrega un valor a un header (concatena si ya existe)
    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.add(name, value);
    }

    /// Obtiene un header, o `""` si no existe
    pub fn header(&self, name: &str) -> &str {
        self.headers.get_or_empty(name)
    }

    /// Agrega bytes al cuerpo de la respuesta
    ///
    /// Varias llamadas se concatenan en orden.
    ///
    /// # Ejemplo
    /// ```
    /// use pool_http::http::Response;
    ///
    /// let mut response = Response::new();
    /// response.write("hello");
    /// response.write(b", world");
    /// assert_eq!(response.body(), b"hello, world");
    /// ```
    pub fn write(&mut self, data: impl AsRef<[u8]>) {
        self.body
            .get_or_insert_with(Vec::new)
            .extend_from_slice(data.as_ref());
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    ///
    /// Antes de serializar fija `Content-Length` con el largo real del body.
    /// Genera:
    /// - Status line: `HTTP/1.1 200 OK\r\n`
    /// - Headers fijos: `Content-Type: text/plain` y `Connection: close`
    /// - Headers del handler en orden: `Key: Value\r\n`
    /// - Línea vacía: `\r\n`
    /// - Body
    ///
    /// # Ejemplo
    /// ```
    /// use pool_http::http::Response;
    ///
    /// let mut response = Response::new();
    /// response.write("hello");
    ///
    /// let text = String::from_utf8(response.to_bytes()).unwrap();
    /// assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
    /// assert!(text.contains("Content-Type: text/plain\r\nConnection: close\r\n"));
    /// assert!(text.contains("Content-Length: 5\r\n"));
    /// ```
    pub fn to_bytes(&mut self) -> Vec<u8> {
        let body: &[u8] = self.body.as_deref().unwrap_or_default();
        let length = body.len().to_string();
        self.headers.set("Content-Length", &length);

        let mut result = Vec::with_capacity(128 + body.len());

        // 1. Status line
        let status_line = format!(
            "HTTP/1.1 {} {}\r\n",
            self.status.as_u16(),
            self.status.reason_phrase()
        );
        result.extend_from_slice(status_line.as_bytes());

        // 2. Headers fijos
        result.extend_from_slice(b"Content-Type: text/plain\r\n");
        result.extend_from_slice(b"Connection: close\r\n");

        // 3. Headers del handler
        for (name, value) in self.headers.iter() {
            let header_line = format!("{}: {}\r\n", name, value);
            result.extend_from_slice(header_line.as_bytes());
        }

        // 4. Línea vacía que separa headers del body
        result.extend_from_slice(b"\r\n");

        // 5. Body
        result.extend_from_slice(self.body.as_deref().unwrap_or_default());

        result
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene una referencia a los headers
    pub fn headers(&self) -> &HeaderStore {
        &self.headers
    }

    /// Obtiene el body (vacío si no se escribió nada)
    pub fn body(&self) -> &[u8] {
        self.body.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_text(response: &mut Response) -> String {
        String::from_utf8(response.to_bytes()).unwrap()
    }

    #[test]
    fn test_new_response() {
        let response = Response::new();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().is_empty());
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_hello_serialization() {
        let mut response = Response::new();
        response.write("hello");

        assert_eq!(
            to_text(&mut response),
            "HTTP/1.1 200 OK\r\n\
             Content-Type: text/plain\r\n\
             Connection: close\r\n\
             Content-Length: 5\r\n\
             \r\n\
             hello"
        );
    }

    #[test]
    fn test_content_length_overrides_handler_value() {
        let mut response = Response::new();
        response.set_header("Content-Length", "999");
        response.write("abc");

        let text = to_text(&mut response);
        assert!(text.contains("Content-Length: 3\r\n"));
        assert!(!text.contains("999"));
        assert_eq!(response.header("Content-Length"), "3");
    }

    #[test]
    fn test_not_found_without_body() {
        let mut response = Response::with_status(StatusCode::NOT_FOUND);
        let text = to_text(&mut response);

        assert!(text.starts_with("HTTP/1.1 404 Not found\r\n"));
        assert!(text.contains("Content-Length: 0\r\n"));
        assert!(text.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_custom_status_uses_ok_reason() {
        let mut response = Response::new();
        response.set_status(StatusCode::new(500));
        assert!(to_text(&mut response).starts_with("HTTP/1.1 500 OK\r\n"));
    }

    #[test]
    fn test_headers_in_insertion_order() {
        let mut response = Response::new();
        response.set_header("X-First", "1");
        response.add_header("X-Second", "a");
        response.add_header("X-Second", "b");

        let text = to_text(&mut response);
        let first = text.find("X-First: 1\r\n").unwrap();
        let second = text.find("X-Second: a;b\r\n").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_binary_body_is_verbatim() {
        let mut response = Response::new();
        response.write([0x00u8, 0xFF, 0x10]);

        let bytes = response.to_bytes();
        assert!(bytes.ends_with(&[b'\r', b'\n', b'\r', b'\n', 0x00, 0xFF, 0x10]));
    }
}
