//! # Parser Incremental de Requests
//! src/http/parser.rs
//!
//! Máquina de estados de tres fases que lee directamente del socket:
//!
//! ```text
//! ┌──────────────┐  \r\n   ┌─────────┐ \r\n\r\n ┌──────┐ Content-Length ┌──────┐
//! │ RequestLine  │ ──────► │ Headers │ ───────► │ Body │ ─────────────► │ Done │
//! └──────────────┘         └─────────┘          └──────┘   bytes leídos  └──────┘
//! ```
//!
//! No hay prefijo de longitud para la cabecera del request: el final de
//! cada fase se detecta byte a byte. Cada fase tiene su propio límite de
//! tamaño y cualquier violación aborta el request.

use super::{HeaderStore, Request};
use crate::error::ParseError;
use std::io::{ErrorKind, Read};

/// Límites de tamaño aplicados en cada fase del parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserLimits {
    /// Máximo de bytes de la request line (sin contar `\r\n`)
    pub max_request_line: usize,

    /// Máximo de caracteres del método
    pub max_method_len: usize,

    /// Máximo de caracteres del path (incluye la query string)
    pub max_path_len: usize,

    /// Máximo de bytes del bloque de headers, incluyendo `\r\n\r\n`
    pub max_header_bytes: usize,

    /// Máximo de bytes aceptados como body
    pub max_body_bytes: usize,
}

impl Default for ParserLimits {
    fn default() -> Self {
        Self {
            max_request_line: 2048,
            max_method_len: 7,
            max_path_len: 1024,
            max_header_bytes: 8192,
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Fase actual del parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    RequestLine,
    Headers,
    Body,
    Done,
}

/// Resultado de leer una línea terminada en `\r\n`
enum Line {
    Complete(Vec<u8>),
    /// El peer cerró la conexión antes del `\r\n`
    Eof,
    /// La línea superó el máximo permitido
    Overflow,
}

/// Parser de un único request sobre cualquier fuente `Read`
pub struct RequestParser<R> {
    reader: R,
    limits: ParserLimits,
    phase: Phase,
}

impl<R: Read> RequestParser<R> {
    pub fn new(reader: R, limits: ParserLimits) -> Self {
        Self {
            reader,
            limits,
            phase: Phase::RequestLine,
        }
    }

    /// Lee un request completo: request line, headers y body
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use pool_http::http::{ParserLimits, RequestParser};
    ///
    /// let raw: &[u8] = b"POST /echo HTTP/1.1\r\nContent-Length: 2\r\n\r\nhi";
    /// let request = RequestParser::new(raw, ParserLimits::default()).parse().unwrap();
    ///
    /// assert_eq!(request.method(), "POST");
    /// assert_eq!(request.body(), b"hi");
    /// ```
    pub fn parse(mut self) -> Result<Request, ParseError> {
        let mut request = Request::default();

        while self.phase != Phase::Done {
            match self.phase {
                Phase::RequestLine => {
                    let (method, path, version) = self.read_request_line()?;
                    request.method = method;
                    request.path = path;
                    request.version = version;
                    self.phase = Phase::Headers;
                }
                Phase::Headers => {
                    self.read_headers(&mut request.headers)?;
                    self.phase = Phase::Body;
                }
                Phase::Body => {
                    request.body = self.read_body(&request.headers)?;
                    self.phase = Phase::Done;
                }
                Phase::Done => {}
            }
        }

        Ok(request)
    }

    /// Lee un byte, reintentando lecturas interrumpidas
    ///
    /// Retorna `None` si el peer cerró la conexión.
    fn read_byte(&mut self) -> Result<Option<u8>, ParseError> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(ParseError::Io(e)),
            }
        }
    }

    /// Acumula bytes hasta `\r\n` o hasta superar `max` bytes de contenido
    fn read_line(&mut self, max: usize) -> Result<Line, ParseError> {
        let mut buf = Vec::new();

        loop {
            let byte = match self.read_byte()? {
                Some(b) => b,
                None => return Ok(Line::Eof),
            };
            buf.push(byte);

            if buf.ends_with(b"\r\n") {
                buf.truncate(buf.len() - 2);
                return Ok(Line::Complete(buf));
            }

            // Un '\r' al final todavía puede ser el inicio del terminador
            let pending_cr = usize::from(byte == b'\r');
            if buf.len() - pending_cr > max {
                return Ok(Line::Overflow);
            }
        }
    }

    /// Fase 1: `METHOD PATH [VERSION]\r\n`
    fn read_request_line(&mut self) -> Result<(String, String, Option<String>), ParseError> {
        let max = self.limits.max_request_line;
        let line = match self.read_line(max)? {
            Line::Complete(line) => line,
            Line::Eof => return Err(ParseError::ConnectionClosed),
            Line::Overflow => return Err(ParseError::LineTooLong(max)),
        };

        let line = String::from_utf8(line).map_err(|e| {
            ParseError::MalformedRequestLine(String::from_utf8_lossy(e.as_bytes()).into_owned())
        })?;

        let mut tokens = line.split_whitespace();
        let (method, path) = match (tokens.next(), tokens.next()) {
            (Some(method), Some(path)) => (method, path),
            _ => return Err(ParseError::MalformedRequestLine(line.clone())),
        };

        if method.len() > self.limits.max_method_len {
            return Err(ParseError::RequestLineTooLong("method"));
        }
        if path.len() > self.limits.max_path_len {
            return Err(ParseError::RequestLineTooLong("path"));
        }

        let version = tokens.next().map(str::to_string);
        Ok((method.to_string(), path.to_string(), version))
    }

    /// Fase 2: líneas `Key: Value\r\n` hasta la línea vacía
    fn read_headers(&mut self, headers: &mut HeaderStore) -> Result<(), ParseError> {
        let max = self.limits.max_header_bytes;
        let mut used = 0usize;

        loop {
            // Cada línea necesita espacio también para su `\r\n`
            let remaining = max.saturating_sub(used);
            if remaining < 2 {
                return Err(ParseError::HeaderBlockTooLarge(max));
            }

            let line = match self.read_line(remaining - 2)? {
                Line::Complete(line) => line,
                Line::Eof => return Err(ParseError::ConnectionClosed),
                Line::Overflow => return Err(ParseError::HeaderBlockTooLarge(max)),
            };
            used += line.len() + 2;

            if line.is_empty() {
                return Ok(());
            }

            let line = String::from_utf8_lossy(&line);
            // Una línea sin ':' se ignora
            if let Some((key, value)) = line.split_once(':') {
                let value = value.trim_start_matches([' ', '\r', '\n']);
                headers.add(key, value);
            }
        }
    }

    /// Fase 3: exactamente `Content-Length` bytes (0 si no hay header)
    fn read_body(&mut self, headers: &HeaderStore) -> Result<Vec<u8>, ParseError> {
        let length = match headers.get("Content-Length") {
            None => 0,
            Some(raw) => self.content_length(raw)?,
        };

        let mut body = vec![0u8; length];
        let mut received = 0;

        while received < length {
            match self.reader.read(&mut body[received..]) {
                Ok(0) => {
                    return Err(ParseError::TruncatedBody {
                        expected: length,
                        received,
                    })
                }
                Ok(n) => received += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(ParseError::Io(e)),
            }
        }

        Ok(body)
    }

    fn content_length(&self, raw: &str) -> Result<usize, ParseError> {
        let invalid = || ParseError::InvalidContentLength(raw.to_string());

        let length: i64 = raw.trim().parse().map_err(|_| invalid())?;
        if length < 0 {
            return Err(invalid());
        }

        let length = usize::try_from(length).map_err(|_| invalid())?;
        if length > self.limits.max_body_bytes {
            return Err(invalid());
        }

        Ok(length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    fn parse(raw: &[u8]) -> Result<Request, ParseError> {
        RequestParser::new(raw, ParserLimits::default()).parse()
    }

    fn parse_with(raw: &[u8], limits: ParserLimits) -> Result<Request, ParseError> {
        RequestParser::new(raw, limits).parse()
    }

    /// Reader que entrega los datos en trozos de `chunk` bytes
    struct Trickle {
        data: Cursor<Vec<u8>>,
        chunk: usize,
        interrupted: bool,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            // Intercalar un EINTR en cada lectura alternada
            self.interrupted = !self.interrupted;
            if self.interrupted {
                return Err(io::Error::new(ErrorKind::Interrupted, "eintr"));
            }
            let n = buf.len().min(self.chunk);
            self.data.read(&mut buf[..n])
        }
    }

    #[test]
    fn test_parse_simple_get() {
        let request = parse(b"GET /test HTTP/1.1\r\nHost: x\r\n\r\n").unwrap();

        assert_eq!(request.method(), "GET");
        assert_eq!(request.path(), "/test");
        assert_eq!(request.version(), Some("HTTP/1.1"));
        assert_eq!(request.header("Host"), "x");
        assert!(request.body().is_empty());
    }

    #[test]
    fn test_path_keeps_query_string() {
        let request = parse(b"GET /search?q=rust&page=2 HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(request.path(), "/search?q=rust&page=2");
    }

    #[test]
    fn test_version_is_optional() {
        let request = parse(b"GET /\r\n\r\n").unwrap();
        assert_eq!(request.version(), None);
    }

    #[test]
    fn test_request_line_with_one_token_is_malformed() {
        let err = parse(b"GET\r\n\r\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedRequestLine(_)));

        let err = parse(b"\r\n\r\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedRequestLine(_)));
    }

    #[test]
    fn test_request_line_too_long() {
        let limits = ParserLimits {
            max_request_line: 16,
            ..ParserLimits::default()
        };
        let err = parse_with(b"GET /aaaaaaaaaaaaaaaaaaaaaaa HTTP/1.1\r\n\r\n", limits).unwrap_err();
        assert!(matches!(err, ParseError::LineTooLong(16)));
    }

    #[test]
    fn test_request_line_at_exact_limit() {
        let limits = ParserLimits {
            max_request_line: 6,
            ..ParserLimits::default()
        };
        // "GET /x" son exactamente 6 bytes
        let request = parse_with(b"GET /x\r\n\r\n", limits).unwrap();
        assert_eq!(request.path(), "/x");
    }

    #[test]
    fn test_oversized_method_fails_closed() {
        let err = parse(b"CONNECTX / HTTP/1.1\r\n\r\n").unwrap_err();
        assert!(matches!(err, ParseError::RequestLineTooLong("method")));
    }

    #[test]
    fn test_oversized_path_fails_closed() {
        let limits = ParserLimits {
            max_path_len: 4,
            ..ParserLimits::default()
        };
        let err = parse_with(b"GET /abcd HTTP/1.1\r\n\r\n", limits).unwrap_err();
        assert!(matches!(err, ParseError::RequestLineTooLong("path")));
    }

    #[test]
    fn test_header_without_colon_is_skipped() {
        let request = parse(b"GET / HTTP/1.1\r\nnot a header\r\nX-Ok: yes\r\n\r\n").unwrap();
        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.header("X-Ok"), "yes");
    }

    #[test]
    fn test_header_value_splits_on_first_colon() {
        let request = parse(b"GET / HTTP/1.1\r\nHost:   localhost:8088\r\n\r\n").unwrap();
        assert_eq!(request.header("Host"), "localhost:8088");
    }

    #[test]
    fn test_repeated_headers_accumulate() {
        let request = parse(b"GET / HTTP/1.1\r\nAccept: a\r\nAccept: b\r\n\r\n").unwrap();
        assert_eq!(request.header("Accept"), "a;b");
    }

    #[test]
    fn test_header_block_too_large() {
        let limits = ParserLimits {
            max_header_bytes: 32,
            ..ParserLimits::default()
        };
        let raw = b"GET / HTTP/1.1\r\nX-Long: aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\r\n\r\n";
        let err = parse_with(raw, limits).unwrap_err();
        assert!(matches!(err, ParseError::HeaderBlockTooLarge(32)));
    }

    #[test]
    fn test_header_block_counts_all_lines() {
        let limits = ParserLimits {
            max_header_bytes: 20,
            ..ParserLimits::default()
        };
        // Cada línea cabe sola, pero el bloque completo no
        let raw = b"GET / HTTP/1.1\r\nA: 1234\r\nB: 1234\r\nC: 1234\r\n\r\n";
        let err = parse_with(raw, limits).unwrap_err();
        assert!(matches!(err, ParseError::HeaderBlockTooLarge(20)));
    }

    #[test]
    fn test_body_with_content_length() {
        let request = parse(b"POST /echo HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello").unwrap();
        assert_eq!(request.body(), b"hello");
    }

    #[test]
    fn test_zero_or_missing_content_length_is_empty_body() {
        let request = parse(b"POST /echo HTTP/1.1\r\nContent-Length: 0\r\n\r\nignored").unwrap();
        assert!(request.body().is_empty());

        let request = parse(b"POST /echo HTTP/1.1\r\n\r\nignored").unwrap();
        assert!(request.body().is_empty());
    }

    #[test]
    fn test_negative_content_length_is_rejected() {
        let err = parse(b"POST / HTTP/1.1\r\nContent-Length: -1\r\n\r\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidContentLength(_)));
    }

    #[test]
    fn test_non_numeric_content_length_is_rejected() {
        let err = parse(b"POST / HTTP/1.1\r\nContent-Length: ten\r\n\r\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidContentLength(_)));
    }

    #[test]
    fn test_content_length_over_limit_is_rejected() {
        let limits = ParserLimits {
            max_body_bytes: 4,
            ..ParserLimits::default()
        };
        let raw = b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
        let err = parse_with(raw, limits).unwrap_err();
        assert!(matches!(err, ParseError::InvalidContentLength(_)));
    }

    #[test]
    fn test_truncated_body() {
        let err = parse(b"POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc").unwrap_err();
        assert!(matches!(
            err,
            ParseError::TruncatedBody {
                expected: 10,
                received: 3
            }
        ));
    }

    #[test]
    fn test_eof_before_head_complete() {
        assert!(matches!(parse(b"").unwrap_err(), ParseError::ConnectionClosed));
        assert!(matches!(parse(b"GET / HT").unwrap_err(), ParseError::ConnectionClosed));
        assert!(matches!(
            parse(b"GET / HTTP/1.1\r\nHost: x\r\n").unwrap_err(),
            ParseError::ConnectionClosed
        ));
    }

    #[test]
    fn test_partial_reads_and_interrupts() {
        let raw = b"POST /echo HTTP/1.1\r\nContent-Length: 11\r\n\r\nhello world".to_vec();
        let reader = Trickle {
            data: Cursor::new(raw),
            chunk: 3,
            interrupted: false,
        };

        let request = RequestParser::new(reader, ParserLimits::default()).parse().unwrap();
        assert_eq!(request.path(), "/echo");
        assert_eq!(request.body(), b"hello world");
    }

    #[test]
    fn test_parser_stops_at_body_boundary() {
        let raw = b"POST / HTTP/1.1\r\nContent-Length: 2\r\n\r\nokEXTRA";
        let mut cursor = Cursor::new(raw.to_vec());
        let request = RequestParser::new(&mut cursor, ParserLimits::default()).parse().unwrap();

        assert_eq!(request.body(), b"ok");
        let mut rest = String::new();
        cursor.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "EXTRA");
    }
}
