//! # Servidor TCP con Pool de Workers
//! src/server/tcp.rs
//!
//! Un solo thread acepta conexiones y las entrega como work items a un pool
//! fijo de workers. Si la cola del pool está llena (o cerrada) la conexión
//! se cierra de inmediato sin respuesta: el acceptor nunca bloquea ni
//! reintenta.
//!
//! ```text
//! accept() ──► WorkItem(Connection) ──► WorkerPool ──► parse → dispatch → write → close
//!                     │
//!                     └── Full/Closed ──► close()
//! ```

use crate::config::Config;
use crate::error::ServerError;
use crate::http::{ParserLimits, Request, Response};
use crate::pool::{PoolConfig, PoolStats, WorkItem, WorkerPool};
use crate::router::RouteTable;
use crate::server::connection::Connection;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::{Ipv4Addr, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Host usado cuando `init` no recibe uno
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Permite detener un servidor que está corriendo `start()` en otro thread
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    stop: Arc<AtomicBool>,
    local_addr: Arc<OnceLock<SocketAddr>>,
}

impl ShutdownHandle {
    /// Pide al acceptor que termine y lo despierta si está bloqueado
    pub fn shutdown(&self) {
        if self.stop.swap(true, Ordering::SeqCst) {
            return;
        }

        // accept() no tiene timeout: una conexión propia lo desbloquea
        if let Some(addr) = self.local_addr.get() {
            let mut target = *addr;
            if target.ip().is_unspecified() {
                target.set_ip(Ipv4Addr::LOCALHOST.into());
            }
            if let Err(e) = TcpStream::connect(target) {
                log::warn!("no se pudo despertar al acceptor en {}: {}", target, e);
            }
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }
}

/// Servidor HTTP/1.1 con pool de workers
pub struct Server {
    config: Config,
    /// Compartido con los workers; solo se modifica antes de servir
    routes: Arc<RouteTable>,
    stats: Arc<PoolStats>,
    listener: Option<TcpListener>,
    shutdown: ShutdownHandle,
}

impl Server {
    /// Crea un servidor con tabla de rutas vacía y configuración por defecto
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            routes: Arc::new(RouteTable::new()),
            stats: Arc::new(PoolStats::new()),
            listener: None,
            shutdown: ShutdownHandle {
                stop: Arc::new(AtomicBool::new(false)),
                local_addr: Arc::new(OnceLock::new()),
            },
        }
    }

    /// Como [`Server::with_config`], pasando host y puerto por [`Server::init`]
    ///
    /// Es la entrada para configuraciones que vienen de afuera (CLI, env):
    /// el puerto 0 se rechaza en vez de bindear un puerto efímero.
    pub fn from_config(config: Config) -> Result<Self, ServerError> {
        let host = config.host.clone();
        let port = u32::from(config.port);

        let mut server = Self::with_config(config);
        server.init(Some(&host), port)?;
        Ok(server)
    }

    /// Fija host y puerto de escucha
    ///
    /// Sin host se usa [`DEFAULT_HOST`]. El puerto debe estar en 1-65535.
    pub fn init(&mut self, host: Option<&str>, port: u32) -> Result<(), ServerError> {
        let port = match u16::try_from(port) {
            Ok(p) if p >= 1 => p,
            _ => return Err(ServerError::InvalidPort(port)),
        };

        self.config.host = host.unwrap_or(DEFAULT_HOST).to_string();
        self.config.port = port;
        Ok(())
    }

    /// Registra una ruta; debe llamarse antes de `start`
    pub fn add_route<F>(&mut self, method: &str, path: &str, handler: F) -> Result<(), ServerError>
    where
        F: Fn(&Request, &mut Response) + Send + Sync + 'static,
    {
        let routes = Arc::get_mut(&mut self.routes).ok_or(ServerError::AlreadyServing)?;
        routes.add_route(method, path, handler)?;
        Ok(())
    }

    /// Abre el socket de escucha (si no está abierto) y retorna su dirección
    pub fn bind(&mut self) -> Result<SocketAddr, ServerError> {
        if let Some(listener) = &self.listener {
            return Ok(listener.local_addr()?);
        }

        let address = self.config.address();
        let addr = address
            .to_socket_addrs()
            .map_err(|_| ServerError::NoAddress(address.clone()))?
            .next()
            .ok_or_else(|| ServerError::NoAddress(address.clone()))?;

        let listener = Self::listen(addr, self.config.backlog)
            .map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener.local_addr()?;

        log::info!("servidor escuchando en {}", local_addr);
        let _ = self.shutdown.local_addr.set(local_addr);
        self.listener = Some(listener);
        Ok(local_addr)
    }

    fn listen(addr: SocketAddr, backlog: u32) -> std::io::Result<TcpListener> {
        let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
        socket.set_reuse_address(true)?;
        socket.bind(&addr.into())?;
        socket.listen(i32::try_from(backlog).unwrap_or(i32::MAX))?;
        Ok(socket.into())
    }

    /// Corre el loop del acceptor hasta que se pida `shutdown`
    ///
    /// Crea el pool al iniciar y lo detiene al salir.
    pub fn start(&mut self) -> Result<(), ServerError> {
        self.config.validate().map_err(ServerError::Config)?;
        self.bind()?;

        let pool_config = PoolConfig {
            threads: self.config.workers,
            queue_capacity: self.config.queue_capacity,
            shutdown_mode: self.config.shutdown_mode,
            name_prefix: "http-worker".to_string(),
        };
        let mut pool = WorkerPool::with_stats(pool_config, Arc::clone(&self.stats))?;
        let limits = self.config.limits();

        // Un shutdown pedido antes del bind no tuvo a quién despertar
        let result = match &self.listener {
            Some(_) if self.shutdown.is_shutdown() => Ok(()),
            Some(listener) => self.accept_loop(listener, &pool, limits),
            None => Ok(()),
        };

        pool.stop();
        log::info!("servidor detenido");
        result
    }

    fn accept_loop(
        &self,
        listener: &TcpListener,
        pool: &WorkerPool,
        limits: ParserLimits,
    ) -> Result<(), ServerError> {
        loop {
            let accepted = listener.accept();

            if self.shutdown.is_shutdown() {
                return Ok(());
            }

            let (stream, peer) = match accepted {
                Ok(pair) => pair,
                Err(e) => {
                    log::error!("error al aceptar conexión: {}", e);
                    continue;
                }
            };

            log::debug!("nueva conexión desde {}", peer);

            let routes = Arc::clone(&self.routes);
            let item = WorkItem::with_cleanup(
                move |conn: &mut Connection| conn.serve(&routes, &limits),
                Connection::new(stream, peer),
                Connection::close,
            );

            match pool.submit(item) {
                Ok(()) if pool.is_saturated() => {
                    log::debug!("cola llena: las próximas conexiones se rechazan");
                }
                Ok(()) => {}
                Err(err) => {
                    match pool.oldest_wait() {
                        Some(wait) => log::warn!(
                            "conexión de {} rechazada: {} (el más antiguo espera hace {:?})",
                            peer,
                            err,
                            wait
                        ),
                        None => log::warn!("conexión de {} rechazada: {}", peer, err),
                    }
                    // Soltar el item cierra el socket sin respuesta
                    drop(err.into_inner());
                }
            }
        }
    }

    /// Handle para detener `start()` desde otro thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Contadores del pool, compartibles con handlers
    pub fn stats(&self) -> Arc<PoolStats> {
        Arc::clone(&self.stats)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.shutdown.local_addr.get().copied()
    }

    /// Cierra el socket de escucha y libera la tabla de rutas
    pub fn destroy(mut self) {
        self.listener = None;
        if let Some(routes) = Arc::get_mut(&mut self.routes) {
            routes.clear();
        }
        log::info!("servidor destruido");
    }
}

impl Default for Server {
    fn default() -> Self {
        Self::new()
    }
}
