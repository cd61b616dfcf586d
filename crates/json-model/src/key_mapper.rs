//! Property name to payload key mapping.

use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum KeyMapper {
    /// Payload keys equal property names.
    #[default]
    Identity,
    /// `redColor` is read from `red_color`.
    SnakeCase,
    /// Per-property overrides; unmapped properties use their own name.
    Explicit(HashMap<String, String>),
}

impl KeyMapper {
    pub fn explicit<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Explicit(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Payload key for property `name`.
    pub fn key_for(&self, name: &str) -> String {
        match self {
            Self::Identity => name.to_string(),
            Self::SnakeCase => camel_to_snake(name),
            Self::Explicit(map) => map.get(name).cloned().unwrap_or_else(|| name.to_string()),
        }
    }
}

fn camel_to_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out
}
