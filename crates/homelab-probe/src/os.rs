//! `/etc/os-release` parsing

use std::collections::HashMap;

/// Key/value pairs of an os-release file, quotes stripped
#[must_use]
pub fn parse_os_release(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            (key.trim().to_string(), value.to_string())
        })
        .filter(|(key, _)| !key.is_empty() && !key.starts_with('#'))
        .collect()
}
