//! # Cola Acotada
//! src/pool/queue.rs
//!
//! Ring buffer de capacidad fija protegido por un `Mutex`, con un `Condvar`
//! asociado a la condición "hay items o la cola se cerró".
//!
//! - `enqueue` nunca bloquea: falla con `Full` o `Closed`.
//! - `dequeue` bloquea mientras la cola esté vacía y abierta.
//! - `shutdown` despierta a todos los threads bloqueados en `dequeue`.

use crate::error::{QueueClosed, QueueError};
use std::sync::{Condvar, Mutex, MutexGuard};

/// Estado interno del ring buffer
struct Ring<T> {
    slots: Vec<Option<T>>,
    /// Índice del próximo item a desencolar
    head: usize,
    /// Índice del próximo slot libre
    tail: usize,
    len: usize,
    closed: bool,
}

impl<T> Ring<T> {
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn push(&mut self, item: T) {
        debug_assert!(self.slots[self.tail].is_none());
        self.slots[self.tail] = Some(item);
        self.tail = (self.tail + 1) % self.capacity();
        self.len += 1;
    }

    fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let item = self.slots[self.head].take();
        self.head = (self.head + 1) % self.capacity();
        self.len -= 1;
        item
    }
}

/// Cola FIFO thread-safe de capacidad fija
pub struct BoundedQueue<T> {
    ring: Mutex<Ring<T>>,
    /// Se notifica cuando `len > 0` o cuando la cola se cierra
    not_empty: Condvar,
}

impl<T> BoundedQueue<T> {
    /// Crea una cola vacía con la capacidad dada
    ///
    /// # Panics
    ///
    /// Si `capacity` es 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be greater than 0");

        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);

        Self {
            ring: Mutex::new(Ring {
                slots,
                head: 0,
                tail: 0,
                len: 0,
                closed: false,
            }),
            not_empty: Condvar::new(),
        }
    }

    // Un panic con el lock tomado no deja el ring en un estado parcial:
    // push/pop no pueden fallar a mitad de camino.
    fn lock(&self) -> MutexGuard<'_, Ring<T>> {
        self.ring.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Encola un item al final sin bloquear
    ///
    /// Retorna el item dentro del error si la cola está llena o cerrada.
    pub fn enqueue(&self, item: T) -> Result<(), QueueError<T>> {
        let mut ring = self.lock();

        if ring.closed {
            return Err(QueueError::Closed(item));
        }
        if ring.len == ring.capacity() {
            return Err(QueueError::Full(item));
        }

        ring.push(item);
        drop(ring);

        // Despertar a un worker esperando
        self.not_empty.notify_one();
        Ok(())
    }

    /// Desencola el item más antiguo
    ///
    /// Bloquea mientras la cola esté vacía y abierta. Después de `shutdown`
    /// sigue entregando los items pendientes y retorna `QueueClosed` cuando
    /// ya no queda ninguno.
    pub fn dequeue(&self) -> Result<T, QueueClosed> {
        let mut ring = self.lock();

        loop {
            if let Some(item) = ring.pop() {
                return Ok(item);
            }
            if ring.closed {
                return Err(QueueClosed);
            }
            ring = self
                .not_empty
                .wait(ring)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    /// Aplica `f` al item más antiguo sin sacarlo de la cola
    ///
    /// La referencia solo vive mientras se tiene el lock.
    pub fn peek<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let ring = self.lock();
        if ring.len == 0 {
            return None;
        }
        ring.slots[ring.head].as_ref().map(f)
    }

    /// Cierra la cola y despierta a todos los threads en `dequeue`
    ///
    /// Es idempotente.
    pub fn shutdown(&self) {
        let mut ring = self.lock();
        ring.closed = true;
        drop(ring);
        self.not_empty.notify_all();
    }

    /// Vacía la cola y retorna los items que no llegaron a ejecutarse
    pub fn drain(&self) -> Vec<T> {
        Self::take_all(&mut self.lock())
    }

    /// Cierra la cola y la vacía bajo el mismo lock
    ///
    /// Ningún `dequeue` puede ver un item pendiente entre el cierre y el
    /// vaciado.
    pub fn close_and_drain(&self) -> Vec<T> {
        let mut ring = self.lock();
        ring.closed = true;
        let pending = Self::take_all(&mut ring);
        drop(ring);

        self.not_empty.notify_all();
        pending
    }

    fn take_all(ring: &mut Ring<T>) -> Vec<T> {
        let mut pending = Vec::with_capacity(ring.len);
        while let Some(item) = ring.pop() {
            pending.push(item);
        }
        pending
    }

    /// Retorna el tamaño actual de la cola
    pub fn len(&self) -> usize {
        self.lock().len
    }

    /// Verifica si la cola está vacía
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retorna la capacidad máxima
    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    /// Verifica si la cola está llena
    pub fn is_full(&self) -> bool {
        let ring = self.lock();
        ring.len == ring.capacity()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}
