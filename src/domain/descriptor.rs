use crate::error::LoggingError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Case-insensitive provider name that keeps its configured spelling.
#[derive(Debug, Clone)]
pub struct ProviderName {
    display: String,
    key: String,
}

impl ProviderName {
    pub fn new(name: impl Into<String>) -> Self {
        let display = name.into();
        let key = display.to_lowercase();
        Self { display, key }
    }

    pub fn as_str(&self) -> &str {
        &self.display
    }

    pub fn is_empty(&self) -> bool {
        self.display.trim().is_empty()
    }
}

impl PartialEq for ProviderName {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ProviderName {}

impl Hash for ProviderName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

impl From<&str> for ProviderName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Attributes of a single provider.
///
/// Providers claim the keys they understand; whatever is left after
/// initialization is reported as unrecognized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ProviderAttributes(HashMap<String, String>);

impl ProviderAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Remove and return an attribute. Empty values count as absent.
    pub fn take(&mut self, key: &str) -> Option<String> {
        self.0.remove(key).filter(|value| !value.trim().is_empty())
    }

    /// Remove a mandatory attribute.
    pub fn take_required(&mut self, key: &str, provider: &str) -> Result<String, LoggingError> {
        self.take(key).ok_or_else(|| {
            LoggingError::Configuration(format!(
                "Empty or missing attribute '{key}' in the configuration of provider '{provider}'."
            ))
        })
    }

    /// Remove a numeric attribute, falling back to `default` when absent.
    pub fn take_parsed<T: std::str::FromStr>(
        &mut self,
        key: &str,
        provider: &str,
        default: T,
    ) -> Result<T, LoggingError> {
        match self.take(key) {
            None => Ok(default),
            Some(raw) => raw.trim().parse().map_err(|_| {
                LoggingError::Configuration(format!(
                    "Invalid value '{raw}' for attribute '{key}' of provider '{provider}'."
                ))
            }),
        }
    }

    /// Remove every `<prefix><N>` attribute and return the values ordered by N.
    ///
    /// Keys whose suffix is not a number are left in place.
    pub fn take_indexed(&mut self, prefix: &str) -> Vec<String> {
        let mut indexed: Vec<(u64, String)> = self
            .0
            .keys()
            .filter_map(|key| {
                let number = key.strip_prefix(prefix)?;
                if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                number.parse::<u64>().ok().map(|n| (n, key.clone()))
            })
            .collect();
        indexed.sort();

        indexed
            .into_iter()
            .filter_map(|(_, key)| self.0.remove(&key))
            .collect()
    }

    /// Keys nobody claimed, sorted for stable error messages.
    pub fn unrecognized(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.0.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ProviderAttributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Raw configuration of one provider, before any validation.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub type_identifier: String,
    #[serde(flatten)]
    pub attributes: ProviderAttributes,
}

impl ProviderDescriptor {
    pub fn new<I, K, V>(name: impl Into<String>, type_identifier: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            type_identifier: type_identifier.into(),
            attributes: attributes.into_iter().collect(),
        }
    }
}
