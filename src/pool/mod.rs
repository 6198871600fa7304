//! # Pool de Workers
//!
//! Cola acotada + threads de larga vida que procesan las conexiones
//! aceptadas. Es el único mecanismo de backpressure del servidor: si la
//! cola está llena, `submit` falla de inmediato y el llamador decide qué
//! hacer con el item rechazado.

pub mod queue;
pub mod stats;
pub mod worker;

pub use queue::BoundedQueue;
pub use stats::{PoolStats, StatsSnapshot};
pub use worker::{PoolConfig, ShutdownMode, WorkItem, WorkerPool};
