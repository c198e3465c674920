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

//! Linda-style blocking tuple space
//!
//! Provides a shared associative store where concurrent tasks coordinate by
//! writing, reading, and taking values under keys, plus a fixed catalog of
//! server-side value transformations.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod space;

// Re-export main types
pub use catalog::{ServiceCatalog, TupleService};
pub use space::{SpaceError, SpaceStats, Tuple, TupleSpace};
