//! Shared trace buffer
//!
//! Bounded FIFO of recent [`TracePoint`]s. The audio thread appends one
//! buffer's worth of points per lock; the UI copies the whole history out
//! once per frame and draws from its copy. Nothing is cleared on stop, so
//! the last trace stays on screen until new points arrive.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use crate::types::{TracePoint, TRACE_CAPACITY};

pub struct TraceBuffer {
    points: Mutex<VecDeque<TracePoint>>,
    capacity: usize,
}

impl TraceBuffer {
    /// Buffer holding the [`TRACE_CAPACITY`] most recent points
    pub fn new() -> Self {
        Self::with_capacity(TRACE_CAPACITY)
    }

    /// Storage is allocated up front so pushes never allocate
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // A panic while holding the lock leaves the deque itself intact
    fn lock(&self) -> MutexGuard<'_, VecDeque<TracePoint>> {
        self.points
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append one point, evicting the oldest when full
    pub fn push(&self, point: TracePoint) {
        let mut points = self.lock();
        push_bounded(&mut points, self.capacity, point);
    }

    /// Append points in order under a single lock
    pub fn push_slice(&self, batch: &[TracePoint]) {
        if batch.is_empty() {
            return;
        }
        let mut points = self.lock();
        for &point in batch {
            push_bounded(&mut points, self.capacity, point);
        }
    }

    /// Copy of the current history, oldest first
    pub fn snapshot(&self) -> Vec<TracePoint> {
        let mut out = Vec::with_capacity(self.capacity);
        self.snapshot_into(&mut out);
        out
    }

    /// Copy the current history into `out`, reusing its allocation
    pub fn snapshot_into(&self, out: &mut Vec<TracePoint>) {
        out.clear();
        let points = self.lock();
        out.extend(points.iter().copied());
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Default for TraceBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn push_bounded(points: &mut VecDeque<TracePoint>, capacity: usize, point: TracePoint) {
    if points.len() >= capacity {
        points.pop_front();
    }
    points.push_back(point);
}
