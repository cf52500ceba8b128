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

use std::io;
use std::io::Write;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;
use std::time::SystemTime;

use conlog::ConsoleHandler;
use conlog::ConsoleHandlerOpts;
use conlog::Handler;
use conlog::Key;
use conlog::Level;
use conlog::Logger;
use conlog::Record;
use conlog::Sink;
use conlog::Value;
use conlog::testing::TestReporter;
use conlog::testing::TestingSink;
use conlog::testing::test_logger;
use jiff::tz::TimeZone;

#[derive(Clone, Debug, Default)]
struct Buffer(Arc<Mutex<Vec<u8>>>);

impl Buffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Sink for Buffer {}

fn quiet_opts() -> ConsoleHandlerOpts {
    ConsoleHandlerOpts {
        remove_time: true,
        remove_source: true,
        ..Default::default()
    }
}

#[test]
fn test_end_to_end_line() {
    let buf = Buffer::default();
    let opts = ConsoleHandlerOpts {
        timezone: Some(TimeZone::UTC),
        ..Default::default()
    };
    let handler = ConsoleHandler::new(buf.clone(), opts);

    // 2024-01-02T03:04:05Z
    let time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_704_164_645);
    let kvs = [(Key::from("port"), Value::from(8080u64))];
    let record = Record::builder()
        .time(Some(time))
        .level(Level::Info)
        .file(Some("/main.go"))
        .line(Some(42))
        .payload("started")
        .key_values(kvs.as_slice())
        .build();
    handler.handle(&record).unwrap();

    assert_eq!(
        buf.contents(),
        "2024-01-02T03:04:05.000Z\tINFO\tmain.go:42\tstarted\t{\"port\":8080}\n"
    );
}

#[test]
fn test_field_omission_combinations() {
    // message only
    let buf = Buffer::default();
    let opts = ConsoleHandlerOpts {
        remove_time: true,
        remove_level: true,
        remove_source: true,
        ..Default::default()
    };
    let handler = ConsoleHandler::new(buf.clone(), opts);
    let record = Record::builder().payload("hi").build();
    handler.handle(&record).unwrap();
    assert_eq!(buf.contents(), "hi\n");

    // level and message, no time carried by the record, no source
    let buf = Buffer::default();
    let handler = ConsoleHandler::new(buf.clone(), ConsoleHandlerOpts::default());
    let record = Record::builder()
        .time(None)
        .level(Level::Error)
        .payload("broken")
        .build();
    handler.handle(&record).unwrap();
    assert_eq!(buf.contents(), "ERROR\tbroken\n");

    // nothing at all still terminates the line
    let buf = Buffer::default();
    let opts = ConsoleHandlerOpts {
        remove_time: true,
        remove_level: true,
        remove_source: true,
        ..Default::default()
    };
    let handler = ConsoleHandler::new(buf.clone(), opts);
    let record = Record::builder().build();
    handler.handle(&record).unwrap();
    assert_eq!(buf.contents(), "\n");
}

#[test]
fn test_derived_loggers_do_not_observe_each_other() {
    let buf = Buffer::default();
    let logger = Logger::new(ConsoleHandler::new(buf.clone(), quiet_opts()));

    let a = logger.with_attrs(&[(Key::from("side"), Value::from("a"))]);
    let b = a.with_group("g").with_attrs(&[(Key::from("side"), Value::from("b"))]);

    a.info("from a", &[]);
    b.info("from b", &[]);
    logger.info("from root", &[]);

    assert_eq!(
        buf.contents(),
        "INFO\tfrom a\t{\"side\":\"a\"}\n\
         INFO\tfrom b\t{\"side\":\"a\",\"g\":{\"side\":\"b\"}}\n\
         INFO\tfrom root\n"
    );
}

#[test]
fn test_logger_records_call_site() {
    let buf = Buffer::default();
    let opts = ConsoleHandlerOpts {
        remove_time: true,
        ..Default::default()
    };
    let logger = Logger::new(ConsoleHandler::new(buf.clone(), opts));

    let call_line = line!() + 1;
    logger.info("here", &[]);

    assert_eq!(
        buf.contents(),
        format!("INFO\ttests/console.rs:{call_line}\there\n")
    );
}

#[test]
fn test_logger_level_gate() {
    let buf = Buffer::default();
    let opts = ConsoleHandlerOpts {
        level: Some(Level::Warn),
        remove_time: true,
        remove_source: true,
        ..Default::default()
    };
    let logger = Logger::new(ConsoleHandler::new(buf.clone(), opts));

    assert!(!logger.enabled(Level::Info));
    assert!(logger.enabled(Level::Warn));

    logger.info("dropped", &[]);
    logger.error("kept", &[]);

    assert_eq!(buf.contents(), "ERROR\tkept\n");
}

#[test]
fn test_concurrent_handles_interleave_whole_lines() {
    let buf = Buffer::default();
    let base: Arc<dyn Handler> = Arc::new(ConsoleHandler::new(buf.clone(), quiet_opts()));

    let mut threads = Vec::new();
    for worker in ["a", "b", "c", "d"] {
        let handler = base
            .clone()
            .with_attrs(&[(Key::from("worker"), Value::from(worker))]);
        threads.push(std::thread::spawn(move || {
            for _ in 0..50 {
                let record = Record::builder().payload("tick").build();
                handler.handle(&record).unwrap();
            }
        }));
    }
    for thread in threads {
        thread.join().unwrap();
    }

    let contents = buf.contents();
    let expected = [
        "INFO\ttick\t{\"worker\":\"a\"}",
        "INFO\ttick\t{\"worker\":\"b\"}",
        "INFO\ttick\t{\"worker\":\"c\"}",
        "INFO\ttick\t{\"worker\":\"d\"}",
    ];

    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 200);
    for line in lines {
        assert!(expected.contains(&line), "interleaved line: {line:?}");
    }
}

#[derive(Debug)]
struct CountingReporter {
    helpers: Arc<AtomicUsize>,
    lines: Arc<Mutex<Vec<String>>>,
}

impl TestReporter for CountingReporter {
    fn helper(&self) {
        self.helpers.fetch_add(1, Ordering::SeqCst);
    }

    fn log(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_owned());
    }
}

#[test]
fn test_testing_sink_strips_one_trailing_newline() {
    let helpers = Arc::new(AtomicUsize::new(0));
    let lines = Arc::new(Mutex::new(Vec::new()));
    let mut sink = TestingSink::new(CountingReporter {
        helpers: helpers.clone(),
        lines: lines.clone(),
    });

    assert_eq!(sink.write(b"hello\n").unwrap(), 6);
    sink.write_all(b"no newline").unwrap();
    sink.write_all(b"keeps one\n\n").unwrap();

    assert_eq!(
        lines.lock().unwrap().as_slice(),
        ["hello", "no newline", "keeps one\n"]
    );
    assert_eq!(helpers.load(Ordering::SeqCst), 3);
}

#[test]
fn test_test_logger_round_trip() {
    let lines = Arc::new(Mutex::new(Vec::<String>::new()));
    let recorded = lines.clone();
    let logger = test_logger(
        move |line: &str| recorded.lock().unwrap().push(line.to_owned()),
        Level::Debug,
    );

    logger.info("started", &[(Key::from("port"), Value::from(8080u64))]);
    logger.trace("below threshold", &[]);

    assert_eq!(
        lines.lock().unwrap().as_slice(),
        ["INFO\tstarted\t{\"port\":8080}"]
    );
}

#[test]
fn test_no_escape_sequences_on_non_terminal_sink() {
    let buf = Buffer::default();
    let logger = Logger::new(ConsoleHandler::new(buf.clone(), quiet_opts()));

    logger.error("plain", &[]);

    assert!(!buf.contents().contains('\x1b'));
}
