//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Mapea la clave literal `"METHOD PATH"` a un handler.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → RouteTable → Handler(&Request, &mut Response) → Response
//! ```
//!
//! Solo hay coincidencia exacta: sin comodines, prefijos ni parámetros.
//! La tabla se llena antes de servir y es de solo lectura después, por lo
//! que los workers la comparten sin sincronización.

use crate::error::RouteError;
use crate::http::{Request, Response, StatusCode};
use std::collections::HashMap;
use std::fmt;

/// Tipo de función handler
///
/// Un handler recibe el request y una respuesta nueva (200, vacía) que
/// puede modificar libremente. No debe retener ninguno de los dos.
pub type Handler = Box<dyn Fn(&Request, &mut Response) + Send + Sync + 'static>;

/// Construye la clave de búsqueda `"METHOD PATH"`
pub fn route_key(method: &str, path: &str) -> String {
    format!("{} {}", method, path)
}

/// Tabla de rutas
#[derive(Default)]
pub struct RouteTable {
    /// Mapa de "METHOD PATH" → handler
    routes: HashMap<String, Handler>,
}

impl RouteTable {
    /// Crea una tabla vacía
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra una ruta con su handler
    ///
    /// Falla si la ruta ya existe; el registro original se conserva.
    ///
    /// # Ejemplo
    /// ```
    /// use pool_http::router::RouteTable;
    /// use pool_http::http::{Request, Response};
    ///
    /// fn hello_handler(_req: &Request, res: &mut Response) {
    ///     res.write("hello");
    /// }
    ///
    /// let mut routes = RouteTable::new();
    /// routes.add_route("GET", "/hello", hello_handler).unwrap();
    /// assert!(routes.add_route("GET", "/hello", hello_handler).is_err());
    /// ```
    pub fn add_route<F>(&mut self, method: &str, path: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(&Request, &mut Response) + Send + Sync + 'static,
    {
        let key = route_key(method, path);
        if self.routes.contains_key(&key) {
            return Err(RouteError::DuplicateRoute(key));
        }

        log::debug!("ruta registrada: {}", key);
        self.routes.insert(key, Box::new(handler));
        Ok(())
    }

    /// Verifica si existe una ruta
    pub fn contains(&self, method: &str, path: &str) -> bool {
        self.routes.contains_key(&route_key(method, path))
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    ///
    /// Si no hay handler para `METHOD PATH`, retorna 404 sin invocar nada.
    pub fn dispatch(&self, request: &Request) -> Response {
        let key = route_key(request.method(), request.path());

        match self.routes.get(&key) {
            Some(handler) => {
                let mut response = Response::new();
                handler(request, &mut response);
                response
            }
            None => Response::with_status(StatusCode::NOT_FOUND),
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Elimina todas las rutas
    pub fn clear(&mut self) {
        self.routes.clear();
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.routes.keys().collect();
        keys.sort();
        f.debug_struct("RouteTable").field("routes", &keys).finish()
    }
}
