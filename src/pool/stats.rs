//! # Estadísticas del Pool
//! src/pool/stats.rs
//!
//! Contadores atómicos compartidos entre el acceptor y los workers.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Contadores del pool (thread-safe, sin lock)
#[derive(Debug, Default)]
pub struct PoolStats {
    submitted: AtomicU64,
    rejected_full: AtomicU64,
    rejected_closed: AtomicU64,
    completed: AtomicU64,
    panicked: AtomicU64,
    discarded: AtomicU64,
}

/// Foto de los contadores en un instante
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub submitted: u64,
    pub rejected_full: u64,
    pub rejected_closed: u64,
    pub completed: u64,
    pub panicked: u64,
    pub discarded: u64,
}

impl StatsSnapshot {
    /// Items aceptados que todavía no terminaron ni se descartaron
    pub fn in_flight(&self) -> u64 {
        self.submitted
            .saturating_sub(self.completed + self.panicked + self.discarded)
    }
}

impl PoolStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected_full(&self) {
        self.rejected_full.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected_closed(&self) {
        self.rejected_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_panicked(&self) {
        self.panicked.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_discarded(&self, count: usize) {
        self.discarded.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            submitted: self.submitted.load(Ordering::Relaxed),
            rejected_full: self.rejected_full.load(Ordering::Relaxed),
            rejected_closed: self.rejected_closed.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            panicked: self.panicked.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
        }
    }

    /// Snapshot serializado como JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }
}
