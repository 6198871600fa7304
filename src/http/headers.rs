//! # Headers HTTP
//! src/http/headers.rs
//!
//! Contenedor ordenado de headers usado por requests y responses.
//!
//! - Las claves distinguen mayúsculas/minúsculas (no se normalizan).
//! - `set` reemplaza el valor existente.
//! - `add` concatena el nuevo valor al existente con [`SEPARATOR`].
//! - La iteración respeta el orden de primera inserción de cada clave.

/// Separador usado por `add` al acumular valores
pub const SEPARATOR: char = ';';

/// Headers de un mensaje HTTP
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderStore {
    entries: Vec<(String, String)>,
}

impl HeaderStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Establece un header, sobrescribiendo cualquier valor previo
    ///
    /// Si la clave ya existía conserva su posición en la iteración.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.position(key) {
            Some(idx) => self.entries[idx].1 = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }

    /// Agrega un valor a un header
    ///
    /// Sobre una clave inexistente equivale a `set`. Sobre una existente,
    /// construye `viejo;nuevo` y reemplaza el valor de una sola vez.
    ///
    /// # Ejemplo
    /// ```
    /// use pool_http::http::HeaderStore;
    ///
    /// let mut headers = HeaderStore::new();
    /// headers.add("Accept", "text/plain");
    /// headers.add("Accept", "text/html");
    /// assert_eq!(headers.get("Accept"), Some("text/plain;text/html"));
    /// ```
    pub fn add(&mut self, key: &str, value: &str) {
        match self.position(key) {
            Some(idx) => {
                let current = &self.entries[idx].1;
                let mut combined = String::with_capacity(current.len() + 1 + value.len());
                combined.push_str(current);
                combined.push(SEPARATOR);
                combined.push_str(value);
                self.entries[idx].1 = combined;
            }
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }

    /// Obtiene el valor de un header
    pub fn get(&self, key: &str) -> Option<&str> {
        self.position(key).map(|idx| self.entries[idx].1.as_str())
    }

    /// Obtiene el valor de un header, o `""` si no existe
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    /// Itera los headers en orden de inserción
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
