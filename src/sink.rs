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

//! Byte-stream sinks that receive rendered log lines.

use std::fs::File;
use std::io;
use std::io::IsTerminal;

/// A destination byte stream for rendered log lines.
///
/// The terminal capability is consulted exactly once, when a handler is
/// constructed, to decide whether output may be colorized.
pub trait Sink: io::Write + Send + 'static {
    /// Whether this sink writes to an interactive terminal.
    ///
    /// Defaults to `false`; only file-like sinks can meaningfully answer.
    fn is_terminal(&self) -> bool {
        false
    }
}

impl Sink for io::Stdout {
    fn is_terminal(&self) -> bool {
        IsTerminal::is_terminal(self)
    }
}

impl Sink for io::Stderr {
    fn is_terminal(&self) -> bool {
        IsTerminal::is_terminal(self)
    }
}

impl Sink for File {
    fn is_terminal(&self) -> bool {
        IsTerminal::is_terminal(self)
    }
}

/// An in-memory sink, never a terminal. Mostly useful in tests.
impl Sink for Vec<u8> {}
