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

//! The module for key-value pairs in a log record.

use value_bag::OwnedValueBag;
use value_bag::ValueBag;

/// Represents a value in a key-value pair.
pub type Value<'a> = ValueBag<'a>;

/// Represents a key in a key-value pair.
#[derive(Debug, Clone, Copy)]
pub struct Key<'a>(&'a str);

impl<'a> Key<'a> {
    /// Gets the key string.
    pub fn as_str(&self) -> &'a str {
        self.0
    }

    pub(crate) fn to_owned(self) -> KeyOwned {
        KeyOwned(self.0.to_string())
    }
}

impl<'a> From<&'a str> for Key<'a> {
    fn from(key: &'a str) -> Self {
        Key(key)
    }
}

impl PartialEq for Key<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

pub(crate) type ValueOwned = OwnedValueBag;

#[derive(Debug, Clone)]
pub(crate) struct KeyOwned(String);

impl KeyOwned {
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

/// The key-value pairs attached to a single log record, borrowed from the
/// caller for the duration of the handler call.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyValues<'a>(&'a [(Key<'a>, Value<'a>)]);

impl<'a> KeyValues<'a> {
    /// Iterate over the pairs in binding order.
    pub fn iter(&self) -> impl Iterator<Item = &'a (Key<'a>, Value<'a>)> {
        self.0.iter()
    }

    /// Whether there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The number of pairs.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<'a> From<&'a [(Key<'a>, Value<'a>)]> for KeyValues<'a> {
    fn from(kvs: &'a [(Key<'a>, Value<'a>)]) -> Self {
        KeyValues(kvs)
    }
}
