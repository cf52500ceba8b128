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

//! Route rendered log lines into a test harness's reporting channel.

use std::io;

use crate::Logger;
use crate::handler::ConsoleHandler;
use crate::handler::ConsoleHandlerOpts;
use crate::record::Level;
use crate::sink::Sink;

/// The subset of a test harness's reporting interface needed to deliver log
/// output, so this crate does not depend on any concrete test framework.
pub trait TestReporter: Send + 'static {
    /// Mark the calling frame as test infrastructure, for harnesses that use
    /// it for source attribution. Defaults to a no-op.
    fn helper(&self) {}

    /// Record one line of test output.
    fn log(&self, line: &str);
}

impl<F> TestReporter for F
where
    F: Fn(&str) + Send + 'static,
{
    fn log(&self, line: &str) {
        self(line)
    }
}

/// A reporter that prints through `eprintln!`, so lines are captured by the
/// standard test harness and suppressed unless `--nocapture` or
/// `--show-output` is specified.
#[derive(Debug, Default)]
pub struct HarnessReporter;

impl TestReporter for HarnessReporter {
    fn log(&self, line: &str) {
        eprintln!("{line}");
    }
}

/// A sink that forwards each written line to a [`TestReporter`].
///
/// # Examples
///
/// ```
/// use conlog::testing::HarnessReporter;
/// use conlog::testing::TestingSink;
///
/// let sink = TestingSink::new(HarnessReporter);
/// ```
#[derive(Debug)]
pub struct TestingSink<R> {
    reporter: R,
}

impl<R: TestReporter> TestingSink<R> {
    /// Create a sink forwarding to `reporter`.
    pub fn new(reporter: R) -> Self {
        Self { reporter }
    }
}

impl<R: TestReporter> io::Write for TestingSink<R> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.reporter.helper();

        let line = String::from_utf8_lossy(buf);
        self.reporter.log(line.strip_suffix('\n').unwrap_or(&line));

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<R: TestReporter> Sink for TestingSink<R> {}

/// Create a ready-to-use [`Logger`] for tests: timestamp and source location
/// suppressed, the given minimum level, lines delivered to `reporter`.
///
/// # Examples
///
/// ```
/// use conlog::Level;
/// use conlog::testing::HarnessReporter;
///
/// let logger = conlog::testing::test_logger(HarnessReporter, Level::Debug);
/// logger.debug("checking invariants", &[]);
/// ```
pub fn test_logger(reporter: impl TestReporter, level: Level) -> Logger {
    let opts = ConsoleHandlerOpts {
        level: Some(level),
        remove_time: true,
        remove_source: true,
        ..Default::default()
    };

    Logger::new(ConsoleHandler::new(TestingSink::new(reporter), opts))
}
