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

use std::io::Write;
use std::panic::Location;
use std::sync::Arc;
use std::time::SystemTime;

use crate::Error;
use crate::handler::Handler;
use crate::kv::Key;
use crate::kv::Value;
use crate::record::Level;
use crate::record::Record;

/// The logger front-end: a cheaply cloneable wrapper over a shared
/// [`Handler`].
///
/// # Examples
///
/// ```
/// use conlog::ConsoleHandler;
/// use conlog::ConsoleHandlerOpts;
/// use conlog::Logger;
///
/// let handler = ConsoleHandler::new(std::io::stderr(), ConsoleHandlerOpts::default());
/// let logger = Logger::new(handler);
///
/// logger.warn("disk almost full", &[]);
/// ```
#[derive(Clone, Debug)]
pub struct Logger {
    handler: Arc<dyn Handler>,
}

impl Logger {
    /// Create a logger over `handler`.
    pub fn new(handler: impl Handler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Create a logger over an already shared handler.
    pub fn from_shared(handler: Arc<dyn Handler>) -> Self {
        Self { handler }
    }

    /// Whether a record at `level` would be emitted.
    pub fn enabled(&self, level: Level) -> bool {
        self.handler.enabled(level)
    }

    /// Emit a record if its level passes the handler's gate.
    ///
    /// A handler failure is reported to stderr rather than returned; logging
    /// must not bubble errors into unrelated control flow.
    pub fn log(&self, record: &Record<'_>) {
        if !self.handler.enabled(record.level()) {
            return;
        }

        if let Err(err) = self.handler.handle(record) {
            report_failure(record, &err);
        }
    }

    /// Derive a logger with `attrs` bound to every subsequent record. This
    /// logger is unaffected.
    pub fn with_attrs(&self, attrs: &[(Key<'_>, Value<'_>)]) -> Logger {
        Logger {
            handler: self.handler.clone().with_attrs(attrs),
        }
    }

    /// Derive a logger that scopes subsequently bound attributes under
    /// `name`. This logger is unaffected.
    pub fn with_group(&self, name: &str) -> Logger {
        Logger {
            handler: self.handler.clone().with_group(name),
        }
    }

    /// Log a message at the error level.
    #[track_caller]
    pub fn error(&self, message: &str, kvs: &[(Key<'_>, Value<'_>)]) {
        self.log_at(Level::Error, message, kvs);
    }

    /// Log a message at the warn level.
    #[track_caller]
    pub fn warn(&self, message: &str, kvs: &[(Key<'_>, Value<'_>)]) {
        self.log_at(Level::Warn, message, kvs);
    }

    /// Log a message at the info level.
    #[track_caller]
    pub fn info(&self, message: &str, kvs: &[(Key<'_>, Value<'_>)]) {
        self.log_at(Level::Info, message, kvs);
    }

    /// Log a message at the debug level.
    #[track_caller]
    pub fn debug(&self, message: &str, kvs: &[(Key<'_>, Value<'_>)]) {
        self.log_at(Level::Debug, message, kvs);
    }

    /// Log a message at the trace level.
    #[track_caller]
    pub fn trace(&self, message: &str, kvs: &[(Key<'_>, Value<'_>)]) {
        self.log_at(Level::Trace, message, kvs);
    }

    #[track_caller]
    fn log_at(&self, level: Level, message: &str, kvs: &[(Key<'_>, Value<'_>)]) {
        if !self.handler.enabled(level) {
            return;
        }

        let location = Location::caller();
        let record = Record::builder()
            .time(Some(SystemTime::now()))
            .level(level)
            .file(Some(location.file()))
            .line(Some(location.line()))
            .payload(message)
            .key_values(kvs)
            .build();

        if let Err(err) = self.handler.handle(&record) {
            report_failure(&record, &err);
        }
    }
}

fn report_failure(record: &Record<'_>, error: &Error) {
    let _ = writeln!(
        std::io::stderr(),
        "error performing logging; message: {:?}; error: {error}",
        record.payload(),
    );
}
