//! # Comandos Básicos
//! src/commands/basic.rs

use crate::http::{Request, Response};
use crate::pool::PoolStats;
use std::sync::Arc;

/// Saludo que escribe `/test`
pub const GREETING: &str = "Tienes un mensaje nuevo, revisa tu bandeja!\r\n";

/// Handler para /test
///
/// Registra cada header del request en nivel debug y escribe un saludo fijo.
pub fn test_handler(req: &Request, res: &mut Response) {
    for (name, value) in req.headers().iter() {
        log::debug!("{} {}:{}", req.remote_host(), name, value);
    }

    res.write(GREETING);
}

/// Handler para /echo
///
/// Devuelve el body tal cual; sin body responde vacío.
pub fn echo_handler(req: &Request, res: &mut Response) {
    res.write(req.body());
}

/// Construye el handler para /stats
///
/// # Ejemplo de response
/// ```json
/// {"submitted":12,"rejected_full":0,"rejected_closed":0,"completed":11,"panicked":0,"discarded":0}
/// ```
pub fn stats_handler(
    stats: Arc<PoolStats>,
) -> impl Fn(&Request, &mut Response) + Send + Sync + 'static {
    move |_req: &Request, res: &mut Response| {
        res.write(stats.to_json());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::RouteTable;

    #[test]
    fn test_test_handler_writes_greeting() {
        let raw = b"GET /test HTTP/1.1\r\nHost: x\r\nUser-Agent: t\r\n\r\n";
        let req = Request::parse(raw).unwrap();
        let mut res = Response::new();

        test_handler(&req, &mut res);
        assert_eq!(res.body(), GREETING.as_bytes());
    }

    #[test]
    fn test_echo_handler() {
        let req = Request::parse(b"POST /echo HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello").unwrap();
        let mut res = Response::new();

        echo_handler(&req, &mut res);
        assert_eq!(res.body(), b"hello");
    }

    #[test]
    fn test_echo_handler_without_body() {
        let req = Request::parse(b"POST /echo HTTP/1.1\r\n\r\n").unwrap();
        let mut res = Response::new();

        echo_handler(&req, &mut res);
        assert!(res.body().is_empty());
    }

    #[test]
    fn test_stats_handler_returns_json() {
        let stats = Arc::new(PoolStats::new());
        let mut routes = RouteTable::new();
        routes.add_route("GET", "/stats", stats_handler(stats)).unwrap();

        let req = Request::parse(b"GET /stats HTTP/1.1\r\n\r\n").unwrap();
        let res = routes.dispatch(&req);

        let json: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(json["submitted"], 0);
        assert_eq!(json["completed"], 0);
    }
}
