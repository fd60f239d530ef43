//! Per-operation request counters.
//!
//! Each REST handler bumps its counter on entry, so the counts reflect
//! requests received rather than requests completed. Counters live behind
//! an `Arc` and clone cheaply into the router state.

use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// The countable schedule resource operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    NessProbe,
    Retrieve,
    ListAll,
    ListByVenue,
    ListActive,
    ListByDay,
    Remove,
    UpdateHealthStatus,
    Health,
}

#[derive(Debug, Default)]
struct Counters {
    create: AtomicU64,
    ness_probe: AtomicU64,
    retrieve: AtomicU64,
    list_all: AtomicU64,
    list_by_venue: AtomicU64,
    list_active: AtomicU64,
    list_by_day: AtomicU64,
    remove: AtomicU64,
    update_health_status: AtomicU64,
    health: AtomicU64,
}

impl Counters {
    fn counter(&self, op: Operation) -> &AtomicU64 {
        match op {
            Operation::Create => &self.create,
            Operation::NessProbe => &self.ness_probe,
            Operation::Retrieve => &self.retrieve,
            Operation::ListAll => &self.list_all,
            Operation::ListByVenue => &self.list_by_venue,
            Operation::ListActive => &self.list_active,
            Operation::ListByDay => &self.list_by_day,
            Operation::Remove => &self.remove,
            Operation::UpdateHealthStatus => &self.update_health_status,
            Operation::Health => &self.health,
        }
    }
}

/// Shared request counters. Cloning shares the underlying counts.
#[derive(Debug, Clone, Default)]
pub struct RequestMetrics {
    counters: Arc<Counters>,
}

/// Point-in-time copy of every counter.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub create: u64,
    pub ness_probe: u64,
    pub retrieve: u64,
    pub list_all: u64,
    pub list_by_venue: u64,
    pub list_active: u64,
    pub list_by_day: u64,
    pub remove: u64,
    pub update_health_status: u64,
    pub health: u64,
}

impl RequestMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one request for the given operation.
    pub fn record(&self, op: Operation) {
        self.counters.counter(op).fetch_add(1, Ordering::Relaxed);
    }

    /// Current count for one operation.
    pub fn get(&self, op: Operation) -> u64 {
        self.counters.counter(op).load(Ordering::Relaxed)
    }

    /// Copy of all counters, e.g. for logging.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            create: self.get(Operation::Create),
            ness_probe: self.get(Operation::NessProbe),
            retrieve: self.get(Operation::Retrieve),
            list_all: self.get(Operation::ListAll),
            list_by_venue: self.get(Operation::ListByVenue),
            list_active: self.get(Operation::ListActive),
            list_by_day: self.get(Operation::ListByDay),
            remove: self.get(Operation::Remove),
            update_health_status: self.get(Operation::UpdateHealthStatus),
            health: self.get(Operation::Health),
        }
    }
}
