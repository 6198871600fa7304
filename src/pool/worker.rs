//! # Pool de Workers
//! src/pool/worker.rs
//!
//! N threads de larga vida que sacan [`WorkItem`]s de una [`BoundedQueue`]
//! y los ejecutan. El pool es dueño exclusivo de sus workers y de la cola.
//!
//! ```text
//! submit() ──► BoundedQueue ──► worker-0 ─┐
//!   (nunca bloquea)        ├──► worker-1 ─┼─► WorkItem::execute()
//!                          └──► worker-N ─┘
//! ```

use crate::error::QueueError;
use crate::pool::queue::BoundedQueue;
use crate::pool::stats::PoolStats;
use serde::Serialize;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Unidad de trabajo diferido
///
/// Agrupa un handler con su argumento. El argumento es propiedad del item
/// hasta que un worker lo ejecuta: se libera exactamente una vez, ya sea
/// por el hook de limpieza después de correr, o por `Drop` si el item se
/// descarta sin ejecutarse.
pub struct WorkItem {
    task: Box<dyn FnOnce() + Send + 'static>,
    queued_at: Instant,
}

impl WorkItem {
    /// Crea un item a partir de un handler y su argumento
    pub fn new<A, H>(handler: H, arg: A) -> Self
    where
        A: Send + 'static,
        H: FnOnce(A) + Send + 'static,
    {
        Self::from_fn(move || handler(arg))
    }

    /// Crea un item que ejecuta `handler` sobre el argumento y luego
    /// entrega el argumento a `cleanup`
    pub fn with_cleanup<A, H, C>(handler: H, arg: A, cleanup: C) -> Self
    where
        A: Send + 'static,
        H: FnOnce(&mut A) + Send + 'static,
        C: FnOnce(A) + Send + 'static,
    {
        Self::from_fn(move || {
            let mut arg = arg;
            handler(&mut arg);
            cleanup(arg);
        })
    }

    /// Crea un item a partir de un closure sin argumento
    pub fn from_fn<F>(f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            task: Box::new(f),
            queued_at: Instant::now(),
        }
    }

    /// Ejecuta el item, consumiéndolo
    pub fn execute(self) {
        (self.task)()
    }
}

impl fmt::Debug for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WorkItem")
    }
}

/// Qué hacer con los items que siguen en la cola al detener el pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ShutdownMode {
    /// Descartar los items pendientes; solo terminan los ya desencolados
    #[default]
    Fast,

    /// Ejecutar todos los items pendientes antes de salir
    Drain,
}

/// Configuración del pool
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Número de workers (fijo durante toda la vida del pool)
    pub threads: usize,

    /// Capacidad de la cola de trabajo
    pub queue_capacity: usize,

    pub shutdown_mode: ShutdownMode,

    /// Prefijo para nombrar los threads (`<prefijo>-<n>`)
    pub name_prefix: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            threads: 10,
            queue_capacity: 1000,
            shutdown_mode: ShutdownMode::Fast,
            name_prefix: "worker".to_string(),
        }
    }
}

/// Pool de threads con cola acotada
pub struct WorkerPool {
    queue: Arc<BoundedQueue<WorkItem>>,
    workers: Vec<JoinHandle<()>>,
    stats: Arc<PoolStats>,
    shutdown_mode: ShutdownMode,
}

impl WorkerPool {
    /// Crea el pool e inicia los workers
    pub fn start(config: PoolConfig) -> std::io::Result<Self> {
        Self::with_stats(config, Arc::new(PoolStats::new()))
    }

    /// Como [`WorkerPool::start`], registrando en contadores compartidos
    pub fn with_stats(config: PoolConfig, stats: Arc<PoolStats>) -> std::io::Result<Self> {
        let queue = Arc::new(BoundedQueue::new(config.queue_capacity));
        let mut pool = Self {
            queue,
            workers: Vec::with_capacity(config.threads),
            stats,
            shutdown_mode: config.shutdown_mode,
        };

        for i in 0..config.threads {
            let name = format!("{}-{}", config.name_prefix, i);
            let queue = Arc::clone(&pool.queue);
            let stats = Arc::clone(&pool.stats);

            let spawned = thread::Builder::new()
                .name(name.clone())
                .spawn(move || Self::worker_loop(name, queue, stats));

            match spawned {
                Ok(handle) => pool.workers.push(handle),
                Err(e) => {
                    // Los workers ya creados se detienen al soltar el pool
                    pool.stop();
                    return Err(e);
                }
            }
        }

        log::info!(
            "pool iniciado: {} workers, cola de {} items, shutdown {:?}",
            config.threads,
            config.queue_capacity,
            config.shutdown_mode
        );

        Ok(pool)
    }

    /// Loop principal del worker
    fn worker_loop(name: String, queue: Arc<BoundedQueue<WorkItem>>, stats: Arc<PoolStats>) {
        log::debug!("worker {} iniciado", name);

        // dequeue solo falla cuando la cola está cerrada y vacía
        while let Ok(item) = queue.dequeue() {
            match panic::catch_unwind(AssertUnwindSafe(|| item.execute())) {
                Ok(()) => stats.record_completed(),
                Err(_) => {
                    stats.record_panicked();
                    log::warn!("worker {}: el item terminó con panic", name);
                }
            }
        }

        log::debug!("worker {} terminado", name);
    }

    /// Encola un item sin bloquear
    ///
    /// En caso de error el item se devuelve al llamador, que es responsable
    /// de liberarlo.
    pub fn submit(&self, item: WorkItem) -> Result<(), QueueError<WorkItem>> {
        match self.queue.enqueue(item) {
            Ok(()) => {
                self.stats.record_submitted();
                Ok(())
            }
            Err(err) => {
                if err.is_full() {
                    self.stats.record_rejected_full();
                } else {
                    self.stats.record_rejected_closed();
                }
                Err(err)
            }
        }
    }

    /// Cierra la cola y espera a que terminen todos los workers
    ///
    /// Con [`ShutdownMode::Fast`] los items aún encolados se descartan sin
    /// ejecutarse. Es idempotente.
    pub fn stop(&mut self) {
        match self.shutdown_mode {
            ShutdownMode::Fast => {
                // Cerrar y vaciar de una vez: ningún worker alcanza a sacar
                // un item pendiente en el medio
                let pending = self.queue.close_and_drain();
                if !pending.is_empty() {
                    log::info!("descartando {} items pendientes", pending.len());
                    self.stats.record_discarded(pending.len());
                }
                // Soltar los items libera sus argumentos (cierra conexiones)
                drop(pending);
            }
            ShutdownMode::Drain => self.queue.shutdown(),
        }

        let workers = std::mem::take(&mut self.workers);
        if workers.is_empty() {
            return;
        }

        let count = workers.len();
        for handle in workers {
            if handle.join().is_err() {
                log::error!("un worker terminó con panic fuera de un item");
            }
        }
        log::info!("pool detenido: {} workers finalizados", count);
    }

    /// Número de workers vivos
    pub fn thread_count(&self) -> usize {
        self.workers.len()
    }

    /// Items esperando en la cola
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// La cola está llena: el próximo `submit` será rechazado
    pub fn is_saturated(&self) -> bool {
        self.queue.is_full()
    }

    /// Cuánto lleva esperando el item más antiguo de la cola
    pub fn oldest_wait(&self) -> Option<Duration> {
        self.queue.peek(|item| item.queued_at.elapsed())
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue.capacity()
    }

    pub fn stats(&self) -> &Arc<PoolStats> {
        &self.stats
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
    }
}
