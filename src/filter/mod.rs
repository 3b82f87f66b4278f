// envbot: env snapshot sync for chat channels
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Include/exclude patterns deciding which values are disclosed.
//!
//! ```text
//! patterns:  "DB_NAME"   name      -> whitelist
//!            "*"         wildcard  -> whitelist (all names)
//!            "!DB_PASS"  exclude   -> blacklist
//!
//! disclosed(key) = key not in blacklist
//!                  && (whitelist empty || "*" in whitelist || key in whitelist)
//!
//! no patterns at all => nothing disclosed
//! ```
//!
//! Undisclosed keys stay in the map with an empty value, so the published
//! snapshot always lists every variable name.

use std::collections::HashSet;
use std::fmt;

use crate::env::EnvMap;

/// A single include/exclude entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// Disclose this exact name.
    Name(String),
    /// Disclose every name.
    Wildcard,
    /// Never disclose this name, whatever else matches.
    Exclude(String),
}

impl Pattern {
    /// Parses a pattern token. Surrounding whitespace is ignored; any other
    /// text is accepted as-is.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        if token == "*" {
            Self::Wildcard
        } else if let Some(name) = token.strip_prefix('!') {
            Self::Exclude(name.to_string())
        } else {
            Self::Name(token.to_string())
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{name}"),
            Self::Wildcard => write!(f, "*"),
            Self::Exclude(name) => write!(f, "!{name}"),
        }
    }
}

/// Compiled pattern list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSet {
    whitelist: HashSet<String>,
    blacklist: HashSet<String>,
    wildcard: bool,
    empty: bool,
}

impl Default for PatternSet {
    fn default() -> Self {
        Self {
            whitelist: HashSet::new(),
            blacklist: HashSet::new(),
            wildcard: false,
            empty: true,
        }
    }
}

impl PatternSet {
    /// Builds a set from raw pattern tokens.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tokens
            .into_iter()
            .map(|t| Pattern::parse(t.as_ref()))
            .collect()
    }

    /// True when no pattern was given at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.empty
    }

    /// Whether the value of `key` is published.
    #[must_use]
    pub fn discloses(&self, key: &str) -> bool {
        if self.empty || self.blacklist.contains(key) {
            return false;
        }
        self.whitelist.is_empty() || self.wildcard || self.whitelist.contains(key)
    }
}

impl FromIterator<Pattern> for PatternSet {
    fn from_iter<I: IntoIterator<Item = Pattern>>(iter: I) -> Self {
        let mut set = Self::default();
        for pattern in iter {
            set.empty = false;
            match pattern {
                Pattern::Name(name) => {
                    set.whitelist.insert(name);
                }
                Pattern::Wildcard => {
                    set.wildcard = true;
                    set.whitelist.insert("*".to_string());
                }
                Pattern::Exclude(name) => {
                    set.blacklist.insert(name);
                }
            }
        }
        set
    }
}

/// Computes the map to publish: every key of `env` is kept, values of keys
/// not disclosed by `patterns` are replaced with the empty string.
#[must_use]
pub fn final_map(env: &EnvMap, patterns: &PatternSet) -> EnvMap {
    env.map_values(|key, value| {
        if patterns.discloses(key) {
            value.to_string()
        } else {
            String::new()
        }
    })
}
