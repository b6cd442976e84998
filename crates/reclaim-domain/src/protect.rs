//! Protect label - unconditional exemption from deletion

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A label that exempts a resource from deletion
///
/// With a value, the resource is protected only when the key maps to exactly
/// that value. Without one, the presence of the key is enough.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectLabel {
    key: String,
    value: Option<String>,
}

impl ProtectLabel {
    /// Protect resources carrying `key`, whatever its value
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }

    /// Protect resources where `key` equals `value`
    pub fn key_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    /// Parse `key[=value]`
    ///
    /// Returns `None` for an empty (or blank) label, which disables protection.
    /// Whitespace around key and value is trimmed; an empty value after `=`
    /// means "key present".
    ///
    /// # Examples
    ///
    /// ```
    /// use reclaim_domain::ProtectLabel;
    ///
    /// assert_eq!(ProtectLabel::parse("keep=true"), Some(ProtectLabel::key_value("keep", "true")));
    /// assert_eq!(ProtectLabel::parse("ttl"), Some(ProtectLabel::key("ttl")));
    /// assert_eq!(ProtectLabel::parse(""), None);
    /// ```
    pub fn parse(label: &str) -> Option<Self> {
        let (key, value) = match label.split_once('=') {
            Some((k, v)) => (k.trim(), v.trim()),
            None => (label.trim(), ""),
        };
        if key.is_empty() {
            return None;
        }
        if value.is_empty() {
            Some(Self::key(key))
        } else {
            Some(Self::key_value(key, value))
        }
    }

    /// The protected label key
    pub fn label_key(&self) -> &str {
        &self.key
    }

    /// The required value, if any
    pub fn label_value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Whether a resource with these labels is protected
    pub fn protects(&self, labels: &BTreeMap<String, String>) -> bool {
        match (&self.value, labels.get(&self.key)) {
            (None, found) => found.is_some(),
            (Some(want), Some(got)) => want == got,
            (Some(_), None) => false,
        }
    }
}

impl fmt::Display for ProtectLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={}", self.key, value),
            None => f.write_str(&self.key),
        }
    }
}

impl FromStr for ProtectLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid protect label '{}': empty key", s))
    }
}
