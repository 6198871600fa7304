//! # Conexiones
//! src/server/connection.rs
//!
//! Una conexión aceptada vive exactamente un ciclo request/response y se
//! cierra siempre al final, haya salido bien o no.

use crate::error::ParseError;
use crate::http::{ParserLimits, RequestParser};
use crate::router::RouteTable;
use std::io::{BufReader, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Instant;

/// Socket aceptado más la dirección del cliente
#[derive(Debug)]
pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
}

impl Connection {
    pub fn new(stream: TcpStream, peer: SocketAddr) -> Self {
        Self { stream, peer }
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Procesa un único request: parsear, despachar, serializar, escribir
    ///
    /// Un error de parsing cierra la conexión sin escribir respuesta.
    pub fn serve(&mut self, routes: &RouteTable, limits: &ParserLimits) {
        let start = Instant::now();

        // Un request por conexión: el read-ahead del BufReader nunca se pierde
        let parsed = RequestParser::new(BufReader::new(&self.stream), *limits).parse();

        let request = match parsed {
            Ok(request) => request.with_peer(self.peer),
            Err(ParseError::ConnectionClosed) => {
                log::debug!("{}: conexión cerrada antes del request", self.peer);
                return;
            }
            Err(e) => {
                log::warn!("{}: request inválido, cerrando sin respuesta: {}", self.peer, e);
                return;
            }
        };

        let mut response = routes.dispatch(&request);
        let bytes = response.to_bytes();

        if let Err(e) = self.stream.write_all(&bytes).and_then(|_| self.stream.flush()) {
            log::error!("{}: error al escribir la respuesta: {}", self.peer, e);
            return;
        }

        log::debug!(
            "{} {} {} -> {} ({:.2}ms)",
            self.peer,
            request.method(),
            request.path(),
            response.status(),
            start.elapsed().as_secs_f64() * 1000.0
        );
    }

    /// Cierra el socket, consumiendo la conexión
    pub fn close(self) {
        // El peer puede haber cerrado ya; el socket se libera igual al soltarlo
        let _ = self.stream.shutdown(Shutdown::Both);
        log::trace!("{}: conexión cerrada", self.peer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Request, Response};
    use std::io::Read;
    use std::net::TcpListener;
    use std::thread;

    /// Acepta una conexión, la procesa con `routes` y la cierra
    fn serve_one(raw: &'static [u8], routes: RouteTable, limits: ParserLimits) -> Vec<u8> {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (stream, peer) = listener.accept().unwrap();
            let mut conn = Connection::new(stream, peer);
            conn.serve(&routes, &limits);
            conn.close();
        });

        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(raw).unwrap();

        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();
        server.join().unwrap();
        buf
    }

    fn routes() -> RouteTable {
        let mut routes = RouteTable::new();
        routes
            .add_route("GET", "/test", |req: &Request, res: &mut Response| {
                res.write(format!("hola {}", req.header("Host")));
            })
            .unwrap();
        routes
    }

    #[test]
    fn test_serve_routed_request() {
        let raw = b"GET /test HTTP/1.1\r\nHost: x\r\n\r\n";
        let buf = serve_one(raw, routes(), ParserLimits::default());
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Length: 6\r\n"));
        assert!(text.ends_with("\r\n\r\nhola x"));
    }

    #[test]
    fn test_serve_not_found() {
        let buf = serve_one(b"GET /missing HTTP/1.1\r\n\r\n", routes(), ParserLimits::default());
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("HTTP/1.1 404 Not found\r\n"));
        assert!(text.contains("Content-Length: 0\r\n"));
    }

    #[test]
    fn test_parse_error_closes_without_response() {
        let buf = serve_one(b"GARBAGE\r\n\r\n", routes(), ParserLimits::default());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_oversized_body_closes_without_response() {
        let limits = ParserLimits {
            max_body_bytes: 8,
            ..ParserLimits::default()
        };
        let buf = serve_one(
            b"POST /test HTTP/1.1\r\nContent-Length: 64\r\n\r\n",
            routes(),
            limits,
        );
        assert!(buf.is_empty());
    }
}
