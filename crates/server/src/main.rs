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

//! TupleWire server binary.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use tuplewire_server::{Server, ServerConfig};
use tuplewire_tuplespace::TupleSpace;

#[derive(Parser)]
#[command(name = "tuplewire-server")]
#[command(about = "Blocking tuple space served over a line-oriented text protocol", long_about = None)]
struct Cli {
    /// Socket address to listen on (overrides env and file settings)
    #[arg(short, long)]
    listen: Option<String>,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = ServerConfig::resolve(cli.listen, cli.config.as_deref())?;

    let listener = TcpListener::bind(&config.listen_addr).await?;
    let server = Server::new(listener, Arc::new(TupleSpace::new()));
    info!("tuple space listening on {}", server.local_addr()?);

    server.run_until_ctrl_c().await
}
