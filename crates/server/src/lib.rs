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

//! Line-protocol transport for the TupleWire tuple space
//!
//! Accepts TCP connections, parses newline-delimited commands into engine
//! calls, and writes one reply line per request. All engine semantics live in
//! `tuplewire-tuplespace`; this crate only translates between the wire and
//! the space.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod protocol;
pub mod server;

pub use config::ServerConfig;
pub use protocol::{ProtocolError, Reply, Request};
pub use server::Server;
