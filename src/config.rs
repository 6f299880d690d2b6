//! Reader for keyed-section text configuration files.
//!
//! ```text
//! ; comment
//! [general]
//! samples per second = 44100
//!
//! [section 1]
//! time duration in seconds = 60
//! ```
//!
//! Section names and keys are matched literally after trimming surrounding
//! whitespace. Lookups never fail: a missing or malformed value yields the
//! caller's default.

use std::{collections::HashMap, convert::Infallible, fs, path::Path, str::FromStr};

use tracing::debug;

use crate::error::{WavIOError, WavIOResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyedConfig {
    sections: HashMap<String, HashMap<String, String>>,
    order: Vec<String>,
}

impl KeyedConfig {
    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    ///
    /// [`WavIOError::ConfigOpen`] when the file can not be read.
    pub fn open<P: AsRef<Path>>(path: P) -> WavIOResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| WavIOError::ConfigOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&String::from_utf8_lossy(&bytes)))
    }

    pub fn parse(text: &str) -> Self {
        let mut config = KeyedConfig::default();
        let mut current = String::new();

        for (number, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                current = name.trim().to_string();
                config.section_mut(&current);
                continue;
            }
            match line.split_once('=') {
                Some((key, value)) => {
                    config
                        .section_mut(&current)
                        .insert(key.trim().to_string(), value.trim().to_string());
                }
                None => debug!(line = number + 1, "ignoring config line without '='"),
            }
        }
        config
    }

    fn section_mut(&mut self, name: &str) -> &mut HashMap<String, String> {
        if !self.sections.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.sections.entry(name.to_string()).or_default()
    }

    fn raw(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|entries| entries.get(key))
            .map(String::as_str)
    }

    pub fn contains(&self, section: &str, key: &str) -> bool {
        self.raw(section, key).is_some()
    }

    /// Section names in the order they first appear.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Integer value of `key`, or `default` when it is missing or not an integer.
    pub fn read_int(&self, section: &str, key: &str, default: i64) -> i64 {
        match self.raw(section, key) {
            Some(value) => value.parse().unwrap_or_else(|_| {
                debug!(section, key, value, "not an integer, using default {}", default);
                default
            }),
            None => default,
        }
    }

    pub fn read_string(&self, section: &str, key: &str, default: &str) -> String {
        self.raw(section, key).unwrap_or(default).to_string()
    }
}

impl FromStr for KeyedConfig {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(KeyedConfig::parse(s))
    }
}
