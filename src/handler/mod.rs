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

//! Pluggable logging back ends.

use std::fmt;
use std::sync::Arc;

use crate::Error;
use crate::kv::Key;
use crate::kv::Value;
use crate::record::Level;
use crate::record::Record;

mod console;

pub use self::console::Capture;
pub use self::console::ConsoleHandler;
pub use self::console::ConsoleHandlerOpts;

/// A logging back end: renders and emits records and derives handlers with
/// pre-bound attributes.
///
/// All four operations are safe to call concurrently. Derivation never
/// affects the handler it was invoked on; derived handlers share the original
/// handler's output stream, so concurrently emitted lines never interleave.
pub trait Handler: fmt::Debug + Send + Sync + 'static {
    /// Report whether a record at `level` would be processed.
    ///
    /// The front-end calls this before constructing a record, so disabled
    /// levels incur no formatting cost.
    fn enabled(&self, level: Level) -> bool;

    /// Render one record and write it to the output.
    fn handle(&self, record: &Record<'_>) -> Result<(), Error>;

    /// Derive a handler with `attrs` bound to every record it processes.
    ///
    /// An empty `attrs` returns the receiver unchanged.
    fn with_attrs(self: Arc<Self>, attrs: &[(Key<'_>, Value<'_>)]) -> Arc<dyn Handler>;

    /// Derive a handler that scopes all attributes bound after this call
    /// under `name` in the serialized output.
    ///
    /// An empty `name` returns the receiver unchanged.
    fn with_group(self: Arc<Self>, name: &str) -> Arc<dyn Handler>;
}
