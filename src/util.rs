use std::{hash::Hash, collections::{HashMap, hash_map::{Entry, OccupiedEntry}}, env::VarError};

use anyhow::{Result, bail};

use crate::error::{ViewError, ViewErrorKind};


// Modified copy of #[unstable(feature = "map_try_insert", issue =
// "82766")] from
// https://doc.rust-lang.org/src/std/collections/hash/map.rs.html#1132-1137,
// avoiding OccupiedError because that's also unstable. FUTURE:
// replace with try_insert.
pub fn hashmap_try_insert<'m, K: Eq + Hash, V>(
    m: &'m mut HashMap<K, V>,
    key: K,
    value: V
) -> Result<&'m mut V, OccupiedEntry<'m, K, V>>
{
    match m.entry(key) {
        Entry::Occupied(entry) => Err(entry),
        Entry::Vacant(entry) => Ok(entry.insert(value)),
    }
}


/// Get an env var as a String; decoding failures are reported as
/// errors. If the var is not set and no fallback was given, an error
/// is reported as well.
pub fn getenv_or(name: &str, fallbackvalue: Option<&str>) -> Result<String> {
    match std::env::var(name) {
        Ok(s) => Ok(s),
        Err(e) => match e {
            VarError::NotPresent =>
                match fallbackvalue {
                    Some(v) => Ok(v.to_string()),
                    None => bail!("{name:?} env var is missing and \
                                   no default provided"),
                },
            VarError::NotUnicode(_) => bail!("{name:?} env var is not unicode"),
        }
    }
}

/// Get an env var as a String; decoding failures are reported as
/// errors.
pub fn getenv(name: &str) -> Result<Option<String>> {
    match std::env::var(name) {
        Ok(s) => Ok(Some(s)),
        Err(e) => match e {
            VarError::NotPresent => Ok(None),
            VarError::NotUnicode(_) => bail!("{name:?} env var is not unicode"),
        }
    }
}

/// Boolean env var: "1"/"true"/"yes"/"on" or "0"/"false"/"no"/"off"
/// (case insensitive); `fallback` if unset.
pub fn getenv_bool(name: &str, fallback: bool) -> Result<bool> {
    match getenv(name)? {
        None => Ok(fallback),
        Some(value) => parse_bool(&value).ok_or_else(|| {
            let e: ViewError = ViewErrorKind::InvalidBool {
                name: name.into(),
                value,
            }.into();
            e.into()
        })
    }
}

pub fn parse_bool(s: &str) -> Option<bool> {
    match &*s.trim().to_ascii_lowercase() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None
    }
}

/// Split `name=value` at the first `=`.
pub fn split_assignment<'s>(
    what: &'static str,
    s: &'s str
) -> Result<(&'s str, &'s str), ViewError> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() =>
            Ok((name.trim(), value)),
        _ => Err(ViewErrorKind::NotAnAssignment {
            what,
            got: s.into()
        }.into())
    }
}
