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

//! Listener and per-connection sessions
//!
//! ## Purpose
//! Accept TCP connections and run one session task per client. A session is
//! a strict request/reply loop: read one line, call the engine (possibly
//! suspending indefinitely inside a blocking `RD`/`IN`/`EX`), write one reply
//! line. An empty line or EOF ends the session.
//!
//! The engine instance is shared via `Arc` and threaded explicitly into
//! every session; nothing here is global.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::select;
use tracing::{debug, info, warn};

use tuplewire_tuplespace::{SpaceError, TupleSpace};

use crate::protocol::{Reply, Request};

/// The TCP front-end of a tuple space.
pub struct Server {
    listener: TcpListener,
    space: Arc<TupleSpace>,
}

impl Server {
    /// Create a server from a bound listener and a shared engine.
    pub fn new(listener: TcpListener, space: Arc<TupleSpace>) -> Self {
        Self { listener, space }
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until `shutdown` completes.
    ///
    /// Sessions already running are detached tasks; a blocked session stays
    /// parked in the engine until a matching write, even across shutdown of
    /// the accept loop.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send,
    {
        let Server { listener, space } = self;
        tokio::pin!(shutdown);

        loop {
            select! {
                _ = &mut shutdown => {
                    info!("server shutting down");
                    break;
                }
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, peer)) => spawn_session(stream, peer, &space),
                        Err(err) => warn!(error = ?err, "failed to accept connection"),
                    }
                }
            }
        }

        Ok(())
    }

    /// Accept connections until ctrl-c.
    pub async fn run_until_ctrl_c(self) -> Result<()> {
        self.run_until(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(error = ?err, "failed to install ctrl-c handler");
            }
        })
        .await
    }
}

fn spawn_session(stream: TcpStream, peer: SocketAddr, space: &Arc<TupleSpace>) {
    let space = Arc::clone(space);
    tokio::spawn(async move {
        debug!(peer = %peer, "client connected");
        match run_session(stream, space).await {
            Ok(()) => debug!(peer = %peer, "client disconnected"),
            Err(err) => warn!(peer = %peer, error = ?err, "session closed with error"),
        }
    });
}

/// Request/reply loop for one connection.
///
/// Each request is fully served before the next line is read — a connection
/// never has more than one operation in flight.
async fn run_session(stream: TcpStream, space: Arc<TupleSpace>) -> std::io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        // An empty request line ends the session, like a disconnect.
        if line.is_empty() {
            break;
        }

        let reply = dispatch(&line, &space).await;
        writer.write_all(reply.to_string().as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }

    Ok(())
}

/// Translate one request line into an engine call and its reply.
async fn dispatch(line: &str, space: &TupleSpace) -> Reply {
    match Request::parse(line) {
        Ok(Request::Write { key, value }) => {
            space.write(&key, value).await;
            Reply::Ok
        }
        Ok(Request::Read { key }) => Reply::Value(space.read(&key).await.into_value()),
        Ok(Request::Take { key }) => Reply::Value(space.take(&key).await.into_value()),
        Ok(Request::Execute {
            source,
            dest,
            service_id,
        }) => match space.execute(&source, &dest, service_id).await {
            Ok(()) => Reply::Ok,
            Err(SpaceError::UnknownService(id)) => {
                warn!(service_id = id, "request named an unknown service");
                Reply::NoService
            }
        },
        Err(err) => {
            warn!(error = %err, "malformed request");
            Reply::Error
        }
    }
}
