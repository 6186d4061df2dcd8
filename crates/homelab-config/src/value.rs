//! Typed accessors over raw YAML values
//!
//! Every accessor takes the dotted field path of the value so failures can
//! name it.

use std::net::IpAddr;

use ipnet::IpNet;
use serde_yaml::{Mapping, Value};

use crate::error::ConfigError;

/// Look up a key, treating an explicit `null` as absent
pub(crate) fn get<'a>(map: &'a Mapping, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|value| !value.is_null())
}

pub(crate) fn mapping<'a>(value: &'a Value, field: &str) -> Result<&'a Mapping, ConfigError> {
    value
        .as_mapping()
        .ok_or_else(|| ConfigError::invalid(field, "must be a mapping"))
}

/// Mapping under `key`, or `None` when the key is absent or null
pub(crate) fn optional_mapping<'a>(
    map: &'a Mapping,
    key: &str,
    field: &str,
) -> Result<Option<&'a Mapping>, ConfigError> {
    get(map, key).map(|value| mapping(value, field)).transpose()
}

pub(crate) fn sequence<'a>(value: &'a Value, field: &str) -> Result<&'a [Value], ConfigError> {
    value
        .as_sequence()
        .map(Vec::as_slice)
        .ok_or_else(|| ConfigError::invalid(field, "must be a list"))
}

pub(crate) fn string<'a>(value: &'a Value, field: &str) -> Result<&'a str, ConfigError> {
    value
        .as_str()
        .ok_or_else(|| ConfigError::invalid(field, "must be a string"))
}

pub(crate) fn required_string<'a>(
    map: &'a Mapping,
    key: &str,
    field: &str,
) -> Result<&'a str, ConfigError> {
    let value = get(map, key).ok_or_else(|| ConfigError::invalid(field, "is required"))?;
    string(value, field)
}

/// Boolean, including the YAML 1.1 spellings (`yes`, `no`, `on`, `off`)
pub(crate) fn boolean(value: &Value, field: &str) -> Result<bool, ConfigError> {
    as_bool(value).ok_or_else(|| ConfigError::invalid(field, "must be a boolean"))
}

pub(crate) fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.as_str() {
            "yes" | "Yes" | "YES" | "on" | "On" | "ON" | "true" | "True" | "TRUE" => Some(true),
            "no" | "No" | "NO" | "off" | "Off" | "OFF" | "false" | "False" | "FALSE" => {
                Some(false)
            }
            _ => None,
        },
        _ => None,
    }
}

/// Mapping keys must be plain strings (network names, hostnames)
pub(crate) fn key<'a>(key: &'a Value, field: &str) -> Result<&'a str, ConfigError> {
    key.as_str()
        .ok_or_else(|| ConfigError::invalid(field, "keys must be strings"))
}

pub(crate) fn ip(value: &Value, field: &str) -> Result<IpAddr, ConfigError> {
    let raw = string(value, field)?;
    raw.parse().map_err(|e| {
        ConfigError::invalid(field, format!("must be a valid IP address: {e}"))
    })
}

/// Network literal; host bits are allowed and cleared
pub(crate) fn cidr(value: &Value, field: &str) -> Result<IpNet, ConfigError> {
    let raw = string(value, field)?;
    raw.parse::<IpNet>()
        .map(|net| net.trunc())
        .map_err(|e| ConfigError::invalid(field, format!("must be a valid CIDR: {e}")))
}

/// OS versions are written as `12`, `25.04` or `"bookworm"`
pub(crate) fn version(value: &Value, field: &str) -> Result<String, ConfigError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(ConfigError::invalid(field, "must be a string or number")),
    }
}
