//! # Códigos de Estado HTTP
//!
//! Los handlers pueden asignar cualquier código numérico. El servidor solo
//! conoce dos reason phrases:
//!
//! - **404**: `Not found`
//! - **cualquier otro**: `OK`

/// Código de estado de una respuesta HTTP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(u16);

impl StatusCode {
    /// 200 OK - valor por defecto de toda respuesta
    pub const OK: StatusCode = StatusCode(200);

    /// 404 Not found - no hay ruta para `METHOD PATH`
    pub const NOT_FOUND: StatusCode = StatusCode(404);

    pub const fn new(code: u16) -> Self {
        StatusCode(code)
    }

    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use pool_http::http::StatusCode;
    /// assert_eq!(StatusCode::OK.as_u16(), 200);
    /// ```
    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// Retorna el texto de razón (reason phrase) asociado al código
    ///
    /// # Ejemplo
    /// ```
    /// use pool_http::http::StatusCode;
    /// assert_eq!(StatusCode::OK.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NOT_FOUND.reason_phrase(), "Not found");
    /// assert_eq!(StatusCode::new(500).reason_phrase(), "OK");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self.0 {
            404 => "Not found",
            _ => "OK",
        }
    }
}

impl Default for StatusCode {
    fn default() -> Self {
        StatusCode::OK
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        StatusCode(code)
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_values() {
        assert_eq!(StatusCode::OK.as_u16(), 200);
        assert_eq!(StatusCode::NOT_FOUND.as_u16(), 404);
        assert_eq!(StatusCode::from(201).as_u16(), 201);
        assert_eq!(StatusCode::default(), StatusCode::OK);
    }

    #[test]
    fn test_reason_phrases() {
        assert_eq!(StatusCode::OK.reason_phrase(), "OK");
        assert_eq!(StatusCode::NOT_FOUND.reason_phrase(), "Not found");
        assert_eq!(StatusCode::new(400).reason_phrase(), "OK");
        assert_eq!(StatusCode::new(503).reason_phrase(), "OK");
    }

    #[test]
    fn test_display() {
        assert_eq!(StatusCode::OK.to_string(), "200 OK");
        assert_eq!(StatusCode::NOT_FOUND.to_string(), "404 Not found");
        assert_eq!(StatusCode::new(500).to_string(), "500 OK");
    }
}
