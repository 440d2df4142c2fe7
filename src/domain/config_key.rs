// SPDX-License-Identifier: MIT OR Apache-2.0

//! Derived lookup keys and identifier normalization.
//!
//! Every bindable field is looked up under a key built from its path of
//! identifiers (an optional application prefix, enclosing struct names, the
//! field name). The path is joined with `_` and normalized to screaming snake
//! case in one pass, so acronym detection works across segment boundaries.

use std::fmt;

/// Canonical delimiter between key tokens.
pub const DELIMITER: &str = "_";

/// A normalized external lookup key such as `DATABASE_MAX_CONNECTIONS`.
///
/// # Examples
///
/// ```
/// use envbind::domain::ConfigKey;
///
/// let key = ConfigKey::from_path(&["database", "maxConnections"]);
/// assert_eq!(key.as_str(), "DATABASE_MAX_CONNECTIONS");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigKey(String);

impl ConfigKey {
    /// Builds a key from path segments, joining them with `_` and normalizing.
    ///
    /// Empty segments are dropped before joining.
    pub fn from_path<S: AsRef<str>>(segments: &[S]) -> Self {
        let joined = segments
            .iter()
            .map(|s| s.as_ref())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(DELIMITER);
        ConfigKey(normalize(&joined))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the `ConfigKey` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for ConfigKey {
    /// Normalizes a single identifier into a key.
    fn from(s: &str) -> Self {
        ConfigKey(normalize(s))
    }
}

impl From<ConfigKey> for String {
    fn from(key: ConfigKey) -> Self {
        key.0
    }
}

impl AsRef<str> for ConfigKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '-' | '_')
}

/// Converts an identifier into `SCREAMING_SNAKE_CASE`.
///
/// Token boundaries are:
///
/// - explicit separators (space, `-`, `_`), collapsed to a single `_`
/// - a lowercase letter followed by an uppercase letter (`someSlice`)
/// - the last capital of an acronym when a lowercase letter follows it
///   (`JSONData` becomes `JSON_DATA`)
/// - a digit followed by a letter (`Item2Name` becomes `ITEM2_NAME`)
///
/// A letter followed by a digit stays in the same token, so version-like
/// suffixes such as `Base64` or `V2` are not split.
///
/// # Examples
///
/// ```
/// use envbind::domain::config_key::normalize;
///
/// assert_eq!(normalize("SomeSlice"), "SOME_SLICE");
/// assert_eq!(normalize("JSONData"), "JSON_DATA");
/// assert_eq!(normalize("Item2Name"), "ITEM2_NAME");
/// assert_eq!(normalize("max-idle conns"), "MAX_IDLE_CONNS");
/// ```
pub fn normalize(identifier: &str) -> String {
    let chars: Vec<char> = identifier.chars().collect();
    let mut tokens: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if is_separator(c) {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            continue;
        }

        if !current.is_empty() && i > 0 {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            let boundary = (prev.is_lowercase() && c.is_uppercase())
                || (prev.is_uppercase()
                    && c.is_uppercase()
                    && next.is_some_and(char::is_lowercase))
                || (prev.is_ascii_digit() && c.is_alphabetic());
            if boundary {
                tokens.push(std::mem::take(&mut current));
            }
        }

        current.extend(c.to_uppercase());
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens.join(DELIMITER)
}
