//! Form values for `application/x-www-form-urlencoded` bodies.

use std::collections::BTreeMap;

/// Ordered multimap of form fields. Keys encode in sorted order; values for
/// one key keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    fields: BTreeMap<String, Vec<String>>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the values already stored under `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.entry(key.into()).or_default().push(value.into());
    }

    /// Replace every value under `key` with `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), vec![value.into()]);
    }

    /// First value under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|v| v.first()).map(String::as_str)
    }

    pub fn get_all(&self, key: &str) -> &[String] {
        self.fields.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Encode as `k1=v1&k1=v2&k2=v3`, keys sorted, values percent-encoded.
    ///
    /// Spaces become `+`. `~` is escaped as `%7E` and `*` is left bare; both
    /// decode to the same value on any form parser.
    pub fn encode(&self) -> String {
        let pairs: Vec<(&str, &str)> = self
            .fields
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
            .collect();
        // Serializing a sequence of string pairs cannot fail.
        serde_urlencoded::to_string(pairs).unwrap_or_default()
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for FormValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K, V> FromIterator<(K, V)> for FormValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = FormValues::new();
        for (k, v) in iter {
            values.add(k, v);
        }
        values
    }
}
