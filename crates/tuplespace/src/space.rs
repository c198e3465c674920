// SPDX-License-Identifier: LGPL-2.1-or-later
// Copyright (C) 2026 TupleWire contributors
//
// This file is part of TupleWire.
//
// TupleWire is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License as published by
// the Free Software Foundation, either version 2.1 of the License, or
// (at your option) any later version.
//
// TupleWire is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with TupleWire. If not, see <https://www.gnu.org/licenses/>.

//! Tuple Space Engine
//!
//! ## Purpose
//! The shared associative blocking store: a map from key to an ordered FIFO
//! queue of tuples, with the four coordination operations (write, blocking
//! read, blocking take, execute-and-store).
//!
//! ## Design
//! - **Storage**: `RwLock<HashMap<String, VecDeque<Tuple>>>` — one exclusive
//!   guard over the whole space.
//! - **Blocking waits**: a single `tokio::sync::Notify` raised on every
//!   write. Waiters register for the wakeup *before* checking their queue,
//!   release the guard, and suspend; on wake they re-check and re-block if
//!   their own key is still empty. The guard is never held across a
//!   suspension point.
//! - **Execute**: the service transformation runs strictly between the
//!   take-side and write-side critical sections, with no space lock held.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{Notify, RwLock};
use tracing::debug;

use crate::catalog::ServiceCatalog;

/// A single stored value record.
///
/// The owning key is implicit: tuples live inside their key's queue. The
/// payload is arbitrary text — possibly empty, possibly containing spaces —
/// but never the transport's line terminator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tuple {
    value: String,
}

impl Tuple {
    /// Create a tuple from a value.
    pub fn new(value: impl Into<String>) -> Self {
        Tuple {
            value: value.into(),
        }
    }

    /// Get the stored value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Consume the tuple, yielding the stored value.
    pub fn into_value(self) -> String {
        self.value
    }
}

/// Engine errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpaceError {
    /// Execute was asked for a service id the catalog does not know.
    #[error("no such service: {0}")]
    UnknownService(i64),
}

/// Operation counters for a space.
///
/// `execute` performs a take and a write internally, so a completed `EX`
/// request bumps `total_takes`, `total_writes`, and `total_executes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpaceStats {
    /// Total number of write operations.
    pub total_writes: u64,
    /// Total number of read operations.
    pub total_reads: u64,
    /// Total number of take operations.
    pub total_takes: u64,
    /// Total number of completed execute operations.
    pub total_executes: u64,
    /// Current number of tuples in the space, across all keys.
    pub current_size: usize,
}

/// The tuple space engine.
///
/// One instance is created at startup and shared (via `Arc`) by every
/// connection handler; there is no ambient global space.
///
/// ```rust
/// use std::sync::Arc;
/// use tuplewire_tuplespace::TupleSpace;
///
/// # async fn example() {
/// let space = Arc::new(TupleSpace::new());
///
/// space.write("jobs", "build").await;
/// assert_eq!(space.read("jobs").await.value(), "build");
/// assert_eq!(space.take("jobs").await.into_value(), "build");
/// # }
/// ```
///
/// `read` and `take` on an empty key suspend the caller until a matching
/// write occurs — indefinitely, if none ever does. That is the documented
/// contract, not an error condition.
#[derive(Debug)]
pub struct TupleSpace {
    /// Key → FIFO queue. The sole shared mutable state of the engine.
    queues: RwLock<HashMap<String, VecDeque<Tuple>>>,
    /// Raised on every write; waiters re-check their own key.
    write_signal: Notify,
    catalog: ServiceCatalog,
    stats: RwLock<SpaceStats>,
}

impl TupleSpace {
    /// Create a space with the builtin service catalog.
    pub fn new() -> Self {
        Self::with_catalog(ServiceCatalog::builtin())
    }

    /// Create a space with a specific service catalog.
    pub fn with_catalog(catalog: ServiceCatalog) -> Self {
        TupleSpace {
            queues: RwLock::new(HashMap::new()),
            write_signal: Notify::new(),
            catalog,
            stats: RwLock::new(SpaceStats::default()),
        }
    }

    /// The service catalog this space consults for `execute`.
    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    /// Append `value` to the tail of `key`'s queue.
    ///
    /// Never blocks, beyond momentary contention for the space guard. Wakes
    /// every blocked `read`/`take` caller; each re-checks its own key.
    pub async fn write(&self, key: &str, value: impl Into<String>) {
        let tuple = Tuple::new(value);
        {
            let mut queues = self.queues.write().await;
            queues.entry(key.to_string()).or_default().push_back(tuple);
        }
        self.write_signal.notify_waiters();

        self.update_stats(|stats| {
            stats.total_writes += 1;
            stats.current_size += 1;
        })
        .await;

        debug!(key, "tuple written");
    }

    /// Return a copy of the value at the head of `key`'s queue, without
    /// removing it. Suspends until the queue is non-empty.
    pub async fn read(&self, key: &str) -> Tuple {
        loop {
            // Register for the wakeup before checking, so a write landing
            // between the check and the await is not lost.
            let notified = self.write_signal.notified();
            {
                let queues = self.queues.read().await;
                if let Some(tuple) = queues.get(key).and_then(|queue| queue.front()) {
                    let tuple = tuple.clone();
                    drop(queues);

                    self.update_stats(|stats| stats.total_reads += 1).await;
                    debug!(key, "tuple read");
                    return tuple;
                }
            }
            // Guard released above; suspend until the next write.
            notified.await;
        }
    }

    /// Atomically remove and return the value at the head of `key`'s queue.
    /// Suspends until the queue is non-empty.
    ///
    /// Each queued value is delivered to at most one `take` caller. Among
    /// several callers blocked on the same key, the winner of the re-check
    /// race consumes the write; no fairness order is guaranteed.
    pub async fn take(&self, key: &str) -> Tuple {
        loop {
            let notified = self.write_signal.notified();
            {
                let mut queues = self.queues.write().await;
                if let Some(tuple) = queues.get_mut(key).and_then(|queue| queue.pop_front()) {
                    // A drained queue stays in the map; it blocks readers
                    // exactly like a key never written to.
                    drop(queues);

                    self.update_stats(|stats| {
                        stats.total_takes += 1;
                        stats.current_size -= 1;
                    })
                    .await;
                    debug!(key, "tuple taken");
                    return tuple;
                }
            }
            notified.await;
        }
    }

    /// Take the head of `source`, feed it through catalog service
    /// `service_id`, and write the output under `dest`.
    ///
    /// The service id is validated before any wait or mutation: an unknown
    /// id fails with [`SpaceError::UnknownService`] and the space is left
    /// untouched. Past validation the operation cannot fail, though it
    /// suspends until `source` has a tuple.
    pub async fn execute(
        &self,
        source: &str,
        dest: &str,
        service_id: i64,
    ) -> Result<(), SpaceError> {
        let service = self
            .catalog
            .lookup(service_id)
            .ok_or(SpaceError::UnknownService(service_id))?;

        let input = self.take(source).await;

        // No space lock is held here: however long the service runs, writes,
        // reads, and takes on every key keep flowing.
        let output = service.apply(input.value());

        self.write(dest, output).await;

        self.update_stats(|stats| stats.total_executes += 1).await;
        debug!(source, dest, service = service.name(), "service applied");
        Ok(())
    }

    /// Snapshot of the operation counters.
    pub async fn stats(&self) -> SpaceStats {
        self.stats.read().await.clone()
    }

    async fn update_stats<F>(&self, update_fn: F)
    where
        F: FnOnce(&mut SpaceStats),
    {
        let mut stats = self.stats.write().await;
        update_fn(&mut stats);
    }
}

impl Default for TupleSpace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn take_is_fifo_per_key() {
        let space = TupleSpace::new();

        space.write("k", "first").await;
        space.write("k", "second").await;
        space.write("k", "third").await;

        assert_eq!(space.take("k").await.into_value(), "first");
        assert_eq!(space.take("k").await.into_value(), "second");
        assert_eq!(space.take("k").await.into_value(), "third");
    }

    #[tokio::test]
    async fn read_does_not_remove() {
        let space = TupleSpace::new();

        space.write("k", "only").await;

        assert_eq!(space.read("k").await.value(), "only");
        assert_eq!(space.read("k").await.value(), "only");
        assert_eq!(space.take("k").await.into_value(), "only");
    }

    #[tokio::test]
    async fn duplicate_values_are_kept() {
        let space = TupleSpace::new();

        space.write("k", "same").await;
        space.write("k", "same").await;

        assert_eq!(space.take("k").await.into_value(), "same");
        assert_eq!(space.take("k").await.into_value(), "same");
    }

    #[tokio::test]
    async fn keys_are_independent_and_case_sensitive() {
        let space = TupleSpace::new();

        space.write("k", "lower").await;
        space.write("K", "upper").await;

        assert_eq!(space.take("K").await.into_value(), "upper");
        assert_eq!(space.take("k").await.into_value(), "lower");
    }

    #[tokio::test]
    async fn execute_applies_builtin_services() {
        let space = TupleSpace::new();

        space.write("a", "hello").await;
        space.execute("a", "b", 1).await.unwrap();
        assert_eq!(space.take("b").await.into_value(), "HELLO");

        space.write("a", "hello").await;
        space.execute("a", "b", 2).await.unwrap();
        assert_eq!(space.take("b").await.into_value(), "olleh");

        space.write("a", "hello").await;
        space.execute("a", "b", 3).await.unwrap();
        assert_eq!(space.take("b").await.into_value(), "5");
    }

    #[tokio::test]
    async fn execute_unknown_service_leaves_space_untouched() {
        let space = TupleSpace::new();

        space.write("src", "precious").await;

        let err = space.execute("src", "dst", 42).await.unwrap_err();
        assert_eq!(err, SpaceError::UnknownService(42));

        // Source still intact, destination never written.
        assert_eq!(space.read("src").await.value(), "precious");
        let stats = space.stats().await;
        assert_eq!(stats.current_size, 1);
        assert_eq!(stats.total_takes, 0);
    }

    #[tokio::test]
    async fn empty_value_round_trips() {
        let space = TupleSpace::new();

        space.write("k", "").await;
        assert_eq!(space.take("k").await.into_value(), "");
    }

    #[tokio::test]
    async fn stats_count_operations() {
        let space = TupleSpace::new();

        space.write("k", "one").await;
        space.write("k", "two").await;
        space.read("k").await;
        space.take("k").await;
        space.execute("k", "out", 1).await.unwrap();

        let stats = space.stats().await;
        assert_eq!(stats.total_writes, 3); // two writes + execute's insert
        assert_eq!(stats.total_reads, 1);
        assert_eq!(stats.total_takes, 2); // one take + execute's removal
        assert_eq!(stats.total_executes, 1);
        assert_eq!(stats.current_size, 1); // "out" still queued
    }
}
