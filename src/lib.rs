// Copyright 2025 Conlog Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Conlog renders structured log records as human-readable, optionally
//! colorized single-line text.
//!
//! # Overview
//!
//! The crate is built around two pieces. [`ConsoleHandler`] formats one record
//! per line (timestamp, level, source location, message, key-value attributes,
//! tab-separated) and writes it to a shared [`Sink`]. [`testing`] adapts a test
//! harness's reporting channel as a sink, so the same handler can deliver its
//! lines through `cargo test` output capture.
//!
//! Handlers are derivable: [`Handler::with_attrs`] and [`Handler::with_group`]
//! return new handlers that share the output stream but carry extra pre-bound
//! attributes, without affecting the handler they were derived from.
//!
//! # Examples
//!
//! ```
//! use conlog::ConsoleHandler;
//! use conlog::ConsoleHandlerOpts;
//! use conlog::Key;
//! use conlog::Logger;
//! use conlog::Value;
//!
//! let handler = ConsoleHandler::new(std::io::stdout(), ConsoleHandlerOpts::default());
//! let logger = Logger::new(handler);
//!
//! logger.info("server started", &[(Key::from("port"), Value::from(8080u64))]);
//! ```
//!
//! Routing the `log` crate facade through a console handler:
//!
//! ```
//! use conlog::ConsoleHandler;
//! use conlog::ConsoleHandlerOpts;
//! use conlog::Logger;
//!
//! let handler = ConsoleHandler::new(std::io::stderr(), ConsoleHandlerOpts::default());
//! Logger::new(handler).apply();
//!
//! log::info!(port = 8080; "server started");
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod error;
pub use error::Error;

pub mod bridge;
pub mod handler;
pub mod kv;
pub mod record;
pub mod sink;
pub mod testing;

pub use handler::Capture;
pub use handler::ConsoleHandler;
pub use handler::ConsoleHandlerOpts;
pub use handler::Handler;
pub use kv::Key;
pub use kv::KeyValues;
pub use kv::Value;
pub use record::Level;
pub use record::Record;
pub use record::RecordBuilder;
pub use sink::Sink;

mod logger;
pub use logger::Logger;
