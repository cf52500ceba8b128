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

use std::borrow::Cow;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::SystemTime;

use jiff::Timestamp;
use jiff::fmt::strtime;
use jiff::tz::TimeZone;
use serde_json::Map;

use crate::Error;
use crate::handler::Handler;
use crate::kv::Key;
use crate::kv::KeyOwned;
use crate::kv::KeyValues;
use crate::kv::Value;
use crate::kv::ValueOwned;
use crate::record::Level;
use crate::record::Record;
use crate::sink::Sink;

/// Capture key under which the rendered timestamp is stored.
pub const TIME_KEY: &str = "time";
/// Capture key under which the level name is stored.
pub const LEVEL_KEY: &str = "level";
/// Capture key under which the shortened source location is stored.
pub const SOURCE_KEY: &str = "source";
/// Capture key under which the message is stored.
pub const MESSAGE_KEY: &str = "msg";

const RESET: &str = "\x1b[0m";

/// Options for [`ConsoleHandler::new`].
#[derive(Debug, Clone, Default)]
pub struct ConsoleHandlerOpts {
    /// Minimum severity level. `None` means [`Level::Info`].
    pub level: Option<Level>,
    /// Omit the timestamp field.
    pub remove_time: bool,
    /// Omit the level field.
    pub remove_level: bool,
    /// Omit the source location field.
    pub remove_source: bool,
    /// Timezone used for the timestamp field. `None` means the system
    /// timezone.
    pub timezone: Option<TimeZone>,
}

/// ANSI escape sequences for coloring level names, one per severity band.
#[derive(Debug, Clone)]
struct LevelColor {
    error: &'static str,
    warn: &'static str,
    info: &'static str,
    debug: &'static str,
    trace: &'static str,
}

impl Default for LevelColor {
    fn default() -> Self {
        Self {
            error: "\x1b[31m", // red
            warn: "\x1b[33m",  // yellow
            info: "\x1b[32m",  // green
            debug: "\x1b[34m", // blue
            trace: "\x1b[35m", // magenta
        }
    }
}

impl LevelColor {
    fn pick(&self, level: Level) -> &'static str {
        match level {
            Level::Error => self.error,
            Level::Warn => self.warn,
            Level::Info => self.info,
            Level::Debug => self.debug,
            Level::Trace => self.trace,
        }
    }
}

/// Captured raw field values of rendered records.
///
/// Attach one with [`ConsoleHandler::with_capture`] so tests can assert on
/// individual fields without re-parsing the formatted line. Field values are
/// captured before coloring and before JSON serialization: the timestamp,
/// level, source, and message strings under [`TIME_KEY`], [`LEVEL_KEY`],
/// [`SOURCE_KEY`], and [`MESSAGE_KEY`], plus each top-level key of the merged
/// attribute mapping. A capture is shared by reference across derived
/// handlers.
///
/// This is test instrumentation only and is not meant for concurrent use.
#[derive(Debug, Clone, Default)]
pub struct Capture {
    fields: Arc<Mutex<Map<String, serde_json::Value>>>,
}

impl Capture {
    /// Create an empty capture map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the captured value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.fields
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn insert(&self, key: &str, value: impl Into<serde_json::Value>) {
        self.fields
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.into());
    }

    fn extend(&self, attrs: &Map<String, serde_json::Value>) {
        self.fields
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(attrs.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}

#[derive(Debug, Clone)]
enum GroupOrAttrs {
    Group(String),
    Attrs(Vec<(KeyOwned, ValueOwned)>),
}

/// A [`Handler`] that writes human-readable lines to a shared sink.
///
/// Output format (fields tab-separated; a suppressed or empty field is
/// omitted together with its separator):
///
/// ```text
/// 2024-01-02T03:04:05.000Z	INFO	server/main.rs:42	started	{"port":8080}
/// ```
///
/// If the sink is an interactive terminal, level names are colorized by
/// severity. Setting the `NO_COLOR` environment variable to any non-empty
/// value disables color. The format is not stable.
///
/// Rendering happens outside the sink lock; only the final single write is
/// serialized, so concurrent `handle` calls never interleave partial lines.
pub struct ConsoleHandler {
    opts: ConsoleHandlerOpts,
    colors: Option<LevelColor>,
    timezone: TimeZone,

    ga: Vec<GroupOrAttrs>,
    capture: Option<Capture>,

    out: Arc<Mutex<Box<dyn Sink>>>,
}

impl fmt::Debug for ConsoleHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleHandler")
            .field("opts", &self.opts)
            .field("colors", &self.colors)
            .field("ga", &self.ga)
            .finish_non_exhaustive()
    }
}

impl ConsoleHandler {
    /// Create a new console handler writing to `sink`.
    ///
    /// If `sink` is an interactive terminal, level names are colorized.
    /// Setting the `NO_COLOR` environment variable to any non-empty value
    /// disables color regardless of the sink. Both checks happen once, here.
    pub fn new(sink: impl Sink, opts: ConsoleHandlerOpts) -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        let colors = (!no_color && sink.is_terminal()).then(LevelColor::default);
        let timezone = opts.timezone.clone().unwrap_or_else(TimeZone::system);

        Self {
            opts,
            colors,
            timezone,
            ga: vec![],
            capture: None,
            out: Arc::new(Mutex::new(Box::new(sink))),
        }
    }

    /// Attach a [`Capture`] recording the raw field values of every rendered
    /// record. Test instrumentation only.
    pub fn with_capture(mut self, capture: Capture) -> Self {
        self.capture = Some(capture);
        self
    }

    // Share everything but the attribute chain, which is extended by copy so
    // the receiver's chain stays untouched.
    fn derive(&self, entry: GroupOrAttrs) -> ConsoleHandler {
        let mut ga = self.ga.clone();
        ga.push(entry);

        ConsoleHandler {
            opts: self.opts.clone(),
            colors: self.colors.clone(),
            timezone: self.timezone.clone(),
            ga,
            capture: self.capture.clone(),
            out: self.out.clone(),
        }
    }

    /// Return the level's display string wrapped in the escape sequence of
    /// its severity band, or plain if this handler renders uncolored.
    fn colorize_level(&self, level: Level) -> Cow<'static, str> {
        match &self.colors {
            None => Cow::Borrowed(level.as_str()),
            Some(colors) => {
                Cow::Owned(format!("{}{}{RESET}", colors.pick(level), level.as_str()))
            }
        }
    }

    // Millisecond precision with a numeric UTC offset; a zero offset renders
    // as "Z", e.g. 2024-01-02T03:04:05.000Z or 2024-01-02T04:04:05.000+0100.
    fn format_time(&self, time: SystemTime) -> String {
        // SAFETY: only fails if the system clock is wildly out of range,
        // which is very unlikely if the clock is correct.
        let ts = Timestamp::try_from(time).unwrap();
        let zoned = ts.to_zoned(self.timezone.clone());

        // SAFETY: the format strings are statically valid.
        let mut out = strtime::format("%Y-%m-%dT%H:%M:%S%.3f", &zoned).unwrap();
        if zoned.offset().seconds() == 0 {
            out.push('Z');
        } else {
            out.push_str(&strtime::format("%z", &zoned).unwrap());
        }

        out
    }
}

impl Handler for ConsoleHandler {
    fn enabled(&self, level: Level) -> bool {
        level >= self.opts.level.unwrap_or(Level::Info)
    }

    fn handle(&self, record: &Record<'_>) -> Result<(), Error> {
        let mut line = String::new();

        if !self.opts.remove_time {
            if let Some(time) = record.time() {
                let t = self.format_time(time);
                line.push_str(&t);

                if let Some(capture) = &self.capture {
                    capture.insert(TIME_KEY, t);
                }
            }
        }

        if !self.opts.remove_level {
            if !line.is_empty() {
                line.push('\t');
            }
            line.push_str(&self.colorize_level(record.level()));

            if let Some(capture) = &self.capture {
                capture.insert(LEVEL_KEY, record.level().as_str());
            }
        }

        if !self.opts.remove_source {
            if let Some(file) = record.file().filter(|f| !f.is_empty()) {
                let source = format!(
                    "{}:{}",
                    short_path(file),
                    record.line().unwrap_or_default()
                );
                if !line.is_empty() {
                    line.push('\t');
                }
                line.push_str(&source);

                if let Some(capture) = &self.capture {
                    capture.insert(SOURCE_KEY, source);
                }
            }
        }

        if !record.payload().is_empty() {
            if !line.is_empty() {
                line.push('\t');
            }
            line.push_str(record.payload());

            if let Some(capture) = &self.capture {
                capture.insert(MESSAGE_KEY, record.payload());
            }
        }

        let attrs = merge_attrs(&self.ga, record.key_values())?;
        if !attrs.is_empty() {
            // serde_json emits a compact single-line object with no
            // HTML-sensitive escaping and no trailing newline.
            let encoded = serde_json::to_string(&attrs)
                .map_err(|err| Error::new("failed to serialize log attributes").with_source(err))?;
            if !line.is_empty() {
                line.push('\t');
            }
            line.push_str(&encoded);

            if let Some(capture) = &self.capture {
                capture.extend(&attrs);
            }
        }

        line.push('\n');

        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        out.write_all(line.as_bytes()).map_err(Error::from_io_error)
    }

    fn with_attrs(self: Arc<Self>, attrs: &[(Key<'_>, Value<'_>)]) -> Arc<dyn Handler> {
        if attrs.is_empty() {
            return self;
        }

        let attrs = attrs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.to_owned()))
            .collect();

        Arc::new(self.derive(GroupOrAttrs::Attrs(attrs)))
    }

    fn with_group(self: Arc<Self>, name: &str) -> Arc<dyn Handler> {
        if name.is_empty() {
            return self;
        }

        Arc::new(self.derive(GroupOrAttrs::Group(name.to_string())))
    }
}

/// Merge the handler's attribute chain with the record's own key-values into
/// one insertion-ordered mapping. A group entry nests everything bound after
/// it, record attributes included, under the group's name; empty groups are
/// dropped. Key collisions are last-write-wins.
fn merge_attrs(
    ga: &[GroupOrAttrs],
    kvs: KeyValues<'_>,
) -> Result<Map<String, serde_json::Value>, Error> {
    let mut merged = Map::new();

    for (i, entry) in ga.iter().enumerate() {
        match entry {
            GroupOrAttrs::Attrs(attrs) => {
                for (key, value) in attrs {
                    merged.insert(key.as_str().to_string(), encode_value(value.by_ref())?);
                }
            }
            GroupOrAttrs::Group(name) => {
                let nested = merge_attrs(&ga[i + 1..], kvs)?;
                if !nested.is_empty() {
                    merged.insert(name.clone(), serde_json::Value::Object(nested));
                }
                return Ok(merged);
            }
        }
    }

    for (key, value) in kvs.iter() {
        merged.insert(key.as_str().to_string(), encode_value(value.by_ref())?);
    }

    Ok(merged)
}

fn encode_value(value: Value<'_>) -> Result<serde_json::Value, Error> {
    serde_json::to_value(value)
        .map_err(|err| Error::new("failed to serialize attribute value").with_source(err))
}

/// Return a shorter rendition of `path`: the basename of its parent directory
/// joined with its own basename, with the parent dropped when it is the
/// filesystem root or absent.
///
/// Panics on an empty path; callers only pass call-site-resolved paths, which
/// are never empty.
fn short_path(path: &str) -> String {
    assert!(!path.is_empty(), "short_path: empty path");

    let path = Path::new(path);
    let file = path
        .file_name()
        .map(|f| f.to_string_lossy())
        .unwrap_or_default();

    match path.parent().and_then(Path::file_name) {
        Some(dir) => format!("{}/{}", dir.to_string_lossy(), file),
        None => file.into_owned(),
    }
}
