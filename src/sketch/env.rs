//! Environment file (.env) parser
//!
//! Flat `KEY=VALUE` lines. Blank lines and `#` comments are ignored, the first
//! `=` splits key from value, and surrounding whitespace is trimmed. There is
//! no quoting or escaping.

use crate::error::{Error, FileKind, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Key/value table parsed from an environment file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvMap {
    entries: HashMap<String, String>,
}

impl EnvMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and parse an environment file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::MissingFile {
                kind: FileKind::Env,
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::parse(&content))
    }

    /// Parse environment file content
    pub fn parse(content: &str) -> Self {
        let mut env = Self::new();

        for (line_num, line) in content.lines().enumerate() {
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            match trimmed.split_once('=') {
                Some((key, value)) => {
                    let key = key.trim();
                    log::debug!("env line {}: {}", line_num + 1, key);
                    env.insert(key, value.trim());
                }
                None => {
                    log::debug!("env line {}: no '=', skipped", line_num + 1);
                }
            }
        }

        env
    }

    /// Insert or overwrite a key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Self::new();
        for (key, value) in iter {
            env.insert(key, value);
        }
        env
    }
}
