//! `<<KEY>>` placeholder substitution

use super::env::EnvMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;

/// Double angle brackets around one or more non-`>` characters
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<<([^>]+)>>").expect("placeholder pattern is valid")
});

/// Replace every placeholder whose key is in `env`. Unknown placeholders are
/// left byte-for-byte unchanged.
pub fn substitute<'a>(content: &'a str, env: &EnvMap) -> Cow<'a, str> {
    PLACEHOLDER.replace_all(content, |caps: &Captures<'_>| match env.get(&caps[1]) {
        Some(value) => value.to_string(),
        None => caps[0].to_string(),
    })
}

/// Keys of all placeholders in `content`, in order of appearance
pub fn placeholders(content: &str) -> Vec<&str> {
    PLACEHOLDER
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Counts of resolved and unresolved placeholders in `content`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaceholderStats {
    pub resolved: usize,
    pub unresolved: usize,
}

impl PlaceholderStats {
    pub fn count(content: &str, env: &EnvMap) -> Self {
        let mut stats = Self::default();
        for key in placeholders(content) {
            if env.contains_key(key) {
                stats.resolved += 1;
            } else {
                stats.unresolved += 1;
            }
        }
        stats
    }
}
