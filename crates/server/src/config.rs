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

//! Server Configuration
//!
//! ## Configuration Hierarchy
//! 1. **CODE**: explicit values (CLI flags) — highest priority
//! 2. **ENV**: `TUPLEWIRE_LISTEN`
//! 3. **FILE**: YAML configuration file
//! 4. **DEFAULT**: `0.0.0.0:54321` — lowest priority
//!
//! ## File format
//! ```yaml
//! listen_addr: 127.0.0.1:54321
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default listen address.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:54321";

/// Environment variable overriding the listen address.
pub const LISTEN_ENV_VAR: &str = "TUPLEWIRE_LISTEN";

fn default_listen_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

/// Resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address the TCP listener binds.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen_addr: default_listen_addr(),
        }
    }
}

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path as given on the command line.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The config file was not valid YAML for [`ServerConfig`].
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// Path as given on the command line.
        path: String,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },
}

impl ServerConfig {
    /// Load configuration from a YAML file (FILE source).
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Overlay environment variables (ENV source) onto `self`.
    pub fn apply_env(mut self) -> Self {
        if let Ok(listen) = std::env::var(LISTEN_ENV_VAR) {
            if !listen.is_empty() {
                self.listen_addr = listen;
            }
        }
        self
    }

    /// Resolve the full hierarchy: FILE (or default), then ENV, then the
    /// explicit CODE override.
    pub fn resolve(
        listen_override: Option<String>,
        config_file: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let mut config = config.apply_env();
        if let Some(listen) = listen_override {
            config.listen_addr = listen;
        }
        Ok(config)
    }
}
