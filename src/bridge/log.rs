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

//! Bridge from the `log` crate facade.

use crate::Logger;
use crate::kv::Key;
use crate::kv::Value;
use crate::record::Level;
use crate::record::Record;

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warn,
            log::Level::Info => Level::Info,
            log::Level::Debug => Level::Debug,
            log::Level::Trace => Level::Trace,
        }
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        Logger::enabled(self, metadata.level().into())
    }

    fn log(&self, record: &log::Record) {
        if !Logger::enabled(self, record.level().into()) {
            return;
        }

        struct KeyValueVisitor<'a, 'b> {
            kvs: &'b mut Vec<(log::kv::Key<'a>, log::kv::Value<'a>)>,
        }

        impl<'a> log::kv::VisitSource<'a> for KeyValueVisitor<'a, '_> {
            fn visit_pair(
                &mut self,
                key: log::kv::Key<'a>,
                value: log::kv::Value<'a>,
            ) -> Result<(), log::kv::Error> {
                self.kvs.push((key, value));
                Ok(())
            }
        }

        let mut pairs = Vec::new();
        let mut visitor = KeyValueVisitor { kvs: &mut pairs };
        // the visitor itself never fails
        let _ = record.key_values().visit(&mut visitor);

        let mut kvs = Vec::with_capacity(pairs.len());
        for (key, value) in pairs.iter() {
            kvs.push((Key::from(key.as_str()), Value::from_serde1(value)));
        }

        let payload = record.args().to_string();
        let record = Record::builder()
            .level(record.level().into())
            .file(record.file())
            .line(record.line())
            .payload(&payload)
            .key_values(kvs.as_slice())
            .build();

        Logger::log(self, &record);
    }

    fn flush(&self) {}
}

impl Logger {
    /// Install this logger as the `log` crate global logger and set the
    /// global maximum level to `Trace`; the handler's own minimum-severity
    /// gate still applies. To lower the global maximum, call
    /// [`log::set_max_level`] afterwards.
    ///
    /// # Errors
    ///
    /// Return an error if the log crate global logger has already been set.
    pub fn try_apply(self) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(log::LevelFilter::Trace);
        Ok(())
    }

    /// Install this logger as the `log` crate global logger.
    ///
    /// # Panics
    ///
    /// Panic if the log crate global logger has already been set.
    pub fn apply(self) {
        self.try_apply()
            .expect("Logger::apply must be called before the log crate global logger is initialized");
    }
}
