use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{Semaphore, SemaphorePermit};

use crate::error::{HltvError, Result};

/// A fixed-capacity admission gate.
///
/// At most `capacity` [`Admission`]s exist at any instant. An admission is
/// returned to the gate when dropped, so every exit path of the holder
/// (success, error, or the future being cancelled) releases it. Waiters are
/// admitted in FIFO order.
#[derive(Debug)]
pub struct AdmissionGate {
    semaphore: Semaphore,
    capacity: usize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl AdmissionGate {
    /// Create a gate admitting `capacity` holders at once (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Semaphore::new(capacity),
            capacity,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Wait for a free unit. Fails with [`HltvError::Cancelled`] once the gate
    /// has been closed.
    pub async fn admit(&self) -> Result<Admission<'_>> {
        let permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| HltvError::Cancelled)?;
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        Ok(Admission {
            _permit: permit,
            in_flight: &self.in_flight,
        })
    }

    /// Refuse all pending and future admissions. Held admissions stay valid
    /// until dropped.
    pub fn close(&self) {
        self.semaphore.close();
    }

    pub fn is_closed(&self) -> bool {
        self.semaphore.is_closed()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of admissions currently held.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of admissions ever held at the same time.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// One unit of an [`AdmissionGate`], released on drop.
#[derive(Debug)]
pub struct Admission<'a> {
    _permit: SemaphorePermit<'a>,
    in_flight: &'a AtomicUsize,
}

impl Drop for Admission<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
