// envbot: env snapshot sync for chat channels
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Env file reading and snapshot serialization.
//!
//! ```text
//! .env.local --load()--> EnvMap --filter::final_map()--> EnvMap
//!                                                          |
//!                                                    to_snapshot()
//!                                                          v
//!                                           "A=1\r\nB=\r\nC=x" (upload)
//! ```
//!
//! - One `NAME=value` per line, blank lines and `#` comments skipped
//! - Values are kept verbatim, quotes included
//! - Key order follows first appearance in the source

use std::path::Path;
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;
use tracing::trace;

use crate::error::{EnvbotResult, ReadError};

/// Ordered mapping of variable name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EnvMap {
    vars: IndexMap<String, String>,
}

/// Keys of the form `__NAME_123__` are internal placeholders and never uploaded.
const PLACEHOLDER_PATTERN: &str = r"__\w+_\d+__$";

fn is_placeholder(key: &str) -> bool {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PLACEHOLDER_PATTERN).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(key))
}

impl EnvMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and parses the env file at `path`.
    ///
    /// Non-UTF-8 bytes are replaced rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError`] if the file cannot be opened or read.
    pub fn load(path: impl AsRef<Path>) -> EnvbotResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&String::from_utf8_lossy(&bytes)))
    }

    /// Parses `NAME=value` lines.
    ///
    /// Lines without `=` or with an empty name are ignored. A repeated name
    /// keeps its first position and takes the last value.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut vars = IndexMap::new();

        for (number, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((name, value)) = line.split_once('=') else {
                trace!(line = number + 1, "skipping line without '='");
                continue;
            };

            let name = name.trim();
            if name.is_empty() {
                trace!(line = number + 1, "skipping line with empty name");
                continue;
            }

            vars.insert(name.to_string(), value.trim().to_string());
        }

        Self { vars }
    }

    /// Inserts or replaces a variable, keeping the position of an existing key.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Variable names in source order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    /// `(name, value)` pairs in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns a copy with every value passed through `f`, keys and order unchanged.
    #[must_use]
    pub fn map_values<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&str, &str) -> String,
    {
        let vars = self
            .vars
            .iter()
            .map(|(k, v)| (k.clone(), f(k, v)))
            .collect();
        Self { vars }
    }

    /// Returns a copy without placeholder keys such as `__TOKEN_123__`.
    #[must_use]
    pub fn without_placeholders(&self) -> Self {
        let vars = self
            .vars
            .iter()
            .filter(|(k, _)| !is_placeholder(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self { vars }
    }

    /// Serializes to the uploaded snapshot format.
    ///
    /// Lines are `NAME=value` joined with CRLF. Placeholder keys are dropped.
    #[must_use]
    pub fn to_snapshot(&self) -> String {
        self.without_placeholders()
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("\r\n")
    }
}

impl<K, V> FromIterator<(K, V)> for EnvMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
