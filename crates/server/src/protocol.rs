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

//! Wire grammar
//!
//! ## Purpose
//! Parse one request line into a typed [`Request`] and format a [`Reply`]
//! back into its reply line.
//!
//! ## Grammar
//! Keywords are case-sensitive; tokens are whitespace-separated; the `WR`
//! value is the rest of the line (whitespace-stripped on the left, verbatim
//! after that, possibly empty).
//!
//! ```text
//! WR <key> [value...]      -> OK
//! RD <key>                 -> OK <value>     (blocks until available)
//! IN <key>                 -> OK <value>     (blocks until available)
//! EX <src> <dst> <svc-id>  -> OK | NO-SERVICE
//! anything else            -> ERROR
//! ```

use std::fmt;

use thiserror::Error;

/// A parsed client request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// `WR key value` — append `value` to `key`'s queue.
    Write {
        /// Target key.
        key: String,
        /// Stored value; may be empty, may contain spaces.
        value: String,
    },
    /// `RD key` — blocking, non-destructive head read.
    Read {
        /// Target key.
        key: String,
    },
    /// `IN key` — blocking take of the head.
    Take {
        /// Target key.
        key: String,
    },
    /// `EX src dst id` — take from `src`, transform, write to `dst`.
    Execute {
        /// Key the input value is taken from.
        source: String,
        /// Key the transformed value is written under.
        dest: String,
        /// Catalog identifier of the transformation.
        service_id: i64,
    },
}

/// Parse failures. The session answers every variant with [`Reply::Error`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The line contained no command token.
    #[error("empty request")]
    Empty,
    /// The command keyword is not part of the grammar.
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),
    /// A required argument was missing.
    #[error("missing {0}")]
    MissingArgument(&'static str),
    /// The `EX` service id did not parse as an integer.
    #[error("invalid service id: {0:?}")]
    InvalidServiceId(String),
}

/// Split the leading whitespace-delimited token off `input`.
fn next_token(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }
    match input.find(char::is_whitespace) {
        Some(end) => Some((&input[..end], &input[end..])),
        None => Some((input, "")),
    }
}

impl Request {
    /// Parse one request line (without its terminator).
    ///
    /// Trailing tokens after a `RD`/`IN` key are ignored.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let (command, rest) = next_token(line).ok_or(ProtocolError::Empty)?;

        match command {
            "WR" => {
                let (key, value) =
                    next_token(rest).ok_or(ProtocolError::MissingArgument("key"))?;
                Ok(Request::Write {
                    key: key.to_string(),
                    value: value.trim_start().to_string(),
                })
            }
            "RD" => {
                let (key, _) = next_token(rest).ok_or(ProtocolError::MissingArgument("key"))?;
                Ok(Request::Read {
                    key: key.to_string(),
                })
            }
            "IN" => {
                let (key, _) = next_token(rest).ok_or(ProtocolError::MissingArgument("key"))?;
                Ok(Request::Take {
                    key: key.to_string(),
                })
            }
            "EX" => {
                let (source, rest) =
                    next_token(rest).ok_or(ProtocolError::MissingArgument("source key"))?;
                let (dest, rest) =
                    next_token(rest).ok_or(ProtocolError::MissingArgument("destination key"))?;
                let (id, _) =
                    next_token(rest).ok_or(ProtocolError::MissingArgument("service id"))?;
                let service_id = id
                    .parse::<i64>()
                    .map_err(|_| ProtocolError::InvalidServiceId(id.to_string()))?;
                Ok(Request::Execute {
                    source: source.to_string(),
                    dest: dest.to_string(),
                    service_id,
                })
            }
            other => Err(ProtocolError::UnknownCommand(other.to_string())),
        }
    }
}

/// A reply line, one per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Acknowledgment with no payload (`WR`, successful `EX`).
    Ok,
    /// Acknowledgment carrying a value (`RD`, `IN`).
    Value(String),
    /// `EX` named a service id the catalog does not know.
    NoService,
    /// The request line did not parse.
    Error,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok => write!(f, "OK"),
            Reply::Value(value) => write!(f, "OK {value}"),
            Reply::NoService => write!(f, "NO-SERVICE"),
            Reply::Error => write!(f, "ERROR"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_write_with_spaces_in_value() {
        let request = Request::parse("WR key hello wide world").unwrap();
        assert_eq!(
            request,
            Request::Write {
                key: "key".to_string(),
                value: "hello wide world".to_string(),
            }
        );
    }

    #[test]
    fn write_value_keeps_trailing_whitespace() {
        let request = Request::parse("WR key  padded  ").unwrap();
        assert_eq!(
            request,
            Request::Write {
                key: "key".to_string(),
                value: "padded  ".to_string(),
            }
        );
    }

    #[test]
    fn write_without_value_stores_empty() {
        let request = Request::parse("WR key").unwrap();
        assert_eq!(
            request,
            Request::Write {
                key: "key".to_string(),
                value: String::new(),
            }
        );
    }

    #[test]
    fn write_without_key_is_malformed() {
        assert_eq!(
            Request::parse("WR"),
            Err(ProtocolError::MissingArgument("key"))
        );
    }

    #[test]
    fn parses_read_and_take() {
        assert_eq!(
            Request::parse("RD jobs").unwrap(),
            Request::Read {
                key: "jobs".to_string()
            }
        );
        assert_eq!(
            Request::parse("IN jobs").unwrap(),
            Request::Take {
                key: "jobs".to_string()
            }
        );
    }

    #[test]
    fn read_ignores_trailing_tokens() {
        assert_eq!(
            Request::parse("RD jobs extra junk").unwrap(),
            Request::Read {
                key: "jobs".to_string()
            }
        );
    }

    #[test]
    fn parses_execute() {
        assert_eq!(
            Request::parse("EX src dst 3").unwrap(),
            Request::Execute {
                source: "src".to_string(),
                dest: "dst".to_string(),
                service_id: 3,
            }
        );
    }

    #[test]
    fn execute_accepts_negative_ids() {
        // A negative id is a well-formed integer; the engine answers it with
        // NO-SERVICE rather than the parser with ERROR.
        assert_eq!(
            Request::parse("EX a b -1").unwrap(),
            Request::Execute {
                source: "a".to_string(),
                dest: "b".to_string(),
                service_id: -1,
            }
        );
    }

    #[test]
    fn execute_with_bad_id_is_malformed() {
        assert_eq!(
            Request::parse("EX a b three"),
            Err(ProtocolError::InvalidServiceId("three".to_string()))
        );
    }

    #[test]
    fn execute_with_missing_args_is_malformed() {
        assert_eq!(
            Request::parse("EX a"),
            Err(ProtocolError::MissingArgument("destination key"))
        );
        assert_eq!(
            Request::parse("EX a b"),
            Err(ProtocolError::MissingArgument("service id"))
        );
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(
            Request::parse("wr key value"),
            Err(ProtocolError::UnknownCommand("wr".to_string()))
        );
    }

    #[test]
    fn unknown_command_is_malformed() {
        assert_eq!(
            Request::parse("PING"),
            Err(ProtocolError::UnknownCommand("PING".to_string()))
        );
    }

    #[test]
    fn replies_format_as_wire_lines() {
        assert_eq!(Reply::Ok.to_string(), "OK");
        assert_eq!(Reply::Value("v with spaces".to_string()).to_string(), "OK v with spaces");
        assert_eq!(Reply::Value(String::new()).to_string(), "OK ");
        assert_eq!(Reply::NoService.to_string(), "NO-SERVICE");
        assert_eq!(Reply::Error.to_string(), "ERROR");
    }
}
