// src/config/helpers.rs
// Helper functions for reading configuration values

use std::str::FromStr;

use crate::error::{PoemError, PoemResult};

/// Source of configuration values, usually the process environment
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Lookup backed by `std::env::var`
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

pub fn env_or(lookup: Lookup, key: &str, default: &str) -> String {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// First non-empty value among `keys`
pub fn env_first(lookup: Lookup, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| lookup(key))
        .find(|v| !v.trim().is_empty())
}

pub fn env_parsed_or<T>(lookup: Lookup, key: &str, default: T) -> PoemResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| PoemError::config(format!("failed to parse {}: {}", key, e))),
        None => Ok(default),
    }
}

/// Comma-separated list, empty entries dropped
pub fn env_list(lookup: Lookup, key: &str, default: &str) -> Vec<String> {
    env_or(lookup, key, default)
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
