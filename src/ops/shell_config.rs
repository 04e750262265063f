use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Parse a shell-style config file into key/value pairs.
///
/// Syntax: one `key=value` per line; blank lines and `#` comments are
/// ignored; double quotes are stripped from values. Lines without exactly
/// one `=` are skipped.
pub fn parse_file(path: &Path) -> Result<HashMap<String, String>> {
    let text = fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
    Ok(parse(&text))
}

/// The value for `key`, or `default` when the key is absent.
pub fn lookup_or(map: &HashMap<String, String>, key: &str, default: &str) -> String {
    map.get(key).cloned().unwrap_or_else(|| default.to_string())
}

fn parse(text: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split('=').collect();
        if fields.len() != 2 {
            debug!(line, "skipping malformed config line");
            continue;
        }
        map.insert(fields[0].to_string(), fields[1].replace('"', ""));
    }
    map
}
