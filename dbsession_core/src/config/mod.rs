pub mod errors;
pub mod properties;
pub mod xml;

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;

pub use errors::ConfigError;

/// Trimmed key/value pairs read from a configuration file.
///
/// Ordered so that two loads of the same file compare and print identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PropertyMap(BTreeMap<String, String>);

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a pair after trimming both sides. Empty-after-trim values are dropped
    /// and `false` is returned.
    pub fn insert_trimmed(&mut self, key: &str, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        self.0.insert(key.trim().to_string(), value.to_string());
        true
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for PropertyMap {
    /// A repeated key keeps its last value, even when that value is blank.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let raw: BTreeMap<String, String> = iter
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
            .collect();

        let mut map = PropertyMap::new();
        for (k, v) in &raw {
            map.insert_trimmed(k, v);
        }
        map
    }
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// The two on-disk layouts a configuration file may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Xml,
    Properties,
}

impl ConfigFormat {
    /// `.xml` (any case) wins; otherwise a document whose first non-blank
    /// byte (after an optional UTF-8 byte order mark) is `<` is treated as XML.
    pub fn detect(path: &Path, content: &[u8]) -> Self {
        let by_extension = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("xml"));

        let body = content.strip_prefix(UTF8_BOM).unwrap_or(content);
        let by_content = body
            .iter()
            .find(|b| !b.is_ascii_whitespace())
            .is_some_and(|&b| b == b'<');

        if by_extension || by_content {
            ConfigFormat::Xml
        } else {
            ConfigFormat::Properties
        }
    }
}

/// Finds `name` on disk: as given first, then (for relative names) under each
/// search directory in order.
pub fn resolve_config_file(name: &str, search_dirs: &[PathBuf]) -> Result<PathBuf, ConfigError> {
    let direct = PathBuf::from(name);
    if direct.is_file() {
        debug!("Using config file {:?}", direct);
        return Ok(direct);
    }

    if direct.is_relative() {
        for dir in search_dirs {
            let candidate = dir.join(&direct);
            if candidate.is_file() {
                debug!("Resolved config file '{}' to {:?}", name, candidate);
                return Ok(candidate);
            }
        }
    }

    Err(ConfigError::NotFound {
        name: name.to_string(),
    })
}

/// Property files are read as UTF-8 when valid, otherwise as ISO-8859-1.
fn decode_properties(bytes: &[u8]) -> Cow<'_, str> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(body) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(body.iter().map(|&b| char::from(b)).collect()),
    }
}

/// Reads and parses a configuration file into a [`PropertyMap`].
///
/// XML documents are decoded according to their declared encoding.
pub fn load_config(path: &Path) -> Result<PropertyMap, ConfigError> {
    let content = fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let format = ConfigFormat::detect(path, &content);
    debug!("Parsing {:?} as {:?}", path, format);

    let pairs = match format {
        ConfigFormat::Xml => xml::parse(&content).map_err(|source| ConfigError::Xml {
            path: path.to_path_buf(),
            source,
        })?,
        ConfigFormat::Properties => {
            properties::parse(&decode_properties(&content)).map_err(|e| ConfigError::Syntax {
                path: path.to_path_buf(),
                line: e.line,
                message: e.message,
            })?
        }
    };

    Ok(pairs.into_iter().collect())
}
