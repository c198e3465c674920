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

//! Service Catalog
//!
//! ## Purpose
//! Fixed registry of server-side value transformations, addressed by integer
//! identifier from `EX` requests. Populated once before the engine starts and
//! never mutated afterwards, so lookups need no locking.
//!
//! ## Builtin services
//! - `1` — uppercase-fold
//! - `2` — reverse
//! - `3` — length as a decimal string

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A pure value transformation invocable through [`TupleSpace::execute`].
///
/// Implementations must be total (never fail) and must not touch the tuple
/// space; the engine invokes them with no space lock held, so a slow service
/// delays only its own `EX` request.
///
/// [`TupleSpace::execute`]: crate::space::TupleSpace::execute
pub trait TupleService: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Apply the transformation.
    fn apply(&self, input: &str) -> String;
}

/// Uppercase-folds the input.
struct Uppercase;

impl TupleService for Uppercase {
    fn name(&self) -> &'static str {
        "uppercase"
    }

    fn apply(&self, input: &str) -> String {
        input.to_uppercase()
    }
}

/// Reverses the input character-wise.
struct Reverse;

impl TupleService for Reverse {
    fn name(&self) -> &'static str {
        "reverse"
    }

    fn apply(&self, input: &str) -> String {
        input.chars().rev().collect()
    }
}

/// Replaces the input with its length in decimal.
struct Length;

impl TupleService for Length {
    fn name(&self) -> &'static str {
        "length"
    }

    fn apply(&self, input: &str) -> String {
        input.chars().count().to_string()
    }
}

/// Immutable mapping from service identifier to transformation.
///
/// Built with the chaining constructors, then handed to the engine:
///
/// ```rust
/// use tuplewire_tuplespace::{ServiceCatalog, TupleSpace};
///
/// let space = TupleSpace::with_catalog(ServiceCatalog::builtin());
/// assert!(space.catalog().lookup(1).is_some());
/// assert!(space.catalog().lookup(42).is_none());
/// ```
pub struct ServiceCatalog {
    services: HashMap<i64, Arc<dyn TupleService>>,
}

impl ServiceCatalog {
    /// Create a catalog with no services registered.
    pub fn empty() -> Self {
        ServiceCatalog {
            services: HashMap::new(),
        }
    }

    /// Create a catalog with the builtin transformations under ids 1-3.
    pub fn builtin() -> Self {
        Self::empty()
            .register(1, Arc::new(Uppercase))
            .register(2, Arc::new(Reverse))
            .register(3, Arc::new(Length))
    }

    /// Register a service under `id`, replacing any previous entry.
    pub fn register(mut self, id: i64, service: Arc<dyn TupleService>) -> Self {
        self.services.insert(id, service);
        self
    }

    /// Look up a service by identifier.
    pub fn lookup(&self, id: i64) -> Option<Arc<dyn TupleService>> {
        self.services.get(&id).cloned()
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether the catalog has no services.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl Default for ServiceCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for ServiceCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self
            .services
            .iter()
            .map(|(id, svc)| (*id, svc.name()))
            .collect();
        ids.sort_unstable();
        f.debug_struct("ServiceCatalog").field("services", &ids).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_uppercase_folds() {
        let catalog = ServiceCatalog::builtin();
        let svc = catalog.lookup(1).unwrap();
        assert_eq!(svc.apply("hello"), "HELLO");
        assert_eq!(svc.apply("MiXeD 42!"), "MIXED 42!");
    }

    #[test]
    fn builtin_reverse_reverses() {
        let catalog = ServiceCatalog::builtin();
        let svc = catalog.lookup(2).unwrap();
        assert_eq!(svc.apply("hello"), "olleh");
        assert_eq!(svc.apply(""), "");
    }

    #[test]
    fn builtin_length_counts_chars() {
        let catalog = ServiceCatalog::builtin();
        let svc = catalog.lookup(3).unwrap();
        assert_eq!(svc.apply("hello"), "5");
        assert_eq!(svc.apply(""), "0");
    }

    #[test]
    fn unknown_id_is_none() {
        let catalog = ServiceCatalog::builtin();
        assert!(catalog.lookup(0).is_none());
        assert!(catalog.lookup(4).is_none());
        assert!(catalog.lookup(-1).is_none());
    }

    #[test]
    fn register_adds_custom_service() {
        struct Shout;
        impl TupleService for Shout {
            fn name(&self) -> &'static str {
                "shout"
            }
            fn apply(&self, input: &str) -> String {
                format!("{input}!")
            }
        }

        let catalog = ServiceCatalog::builtin().register(99, Arc::new(Shout));
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.lookup(99).unwrap().apply("hey"), "hey!");
    }
}
