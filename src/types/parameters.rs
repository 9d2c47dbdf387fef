//! Query API request parameters.

use std::collections::btree_map;
use std::collections::BTreeMap;

/// Parameters of a single Query API request.
///
/// Names use the dot-and-index path notation of the Query API, for example
/// `Destination.ToAddresses.member.1`. Iteration is always in byte-wise
/// ascending key order, which is the order the canonical query string needs.
/// Inserting a name that is already present replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParameters {
    inner: BTreeMap<String, String>,
}

impl RequestParameters {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parameter set holding only `Action=<action>`.
    pub fn for_action(action: &str) -> Self {
        let mut params = Self::new();
        params.insert("Action", action);
        params
    }

    /// Insert a parameter, returning the previous value for that name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.inner.insert(name.into(), value.into())
    }

    /// Look up a parameter value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(name).map(String::as_str)
    }

    /// The `Action` parameter, if set.
    pub fn action(&self) -> Option<&str> {
        self.get("Action")
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate over `(name, value)` pairs in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for RequestParameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        params.extend(iter);
        params
    }
}

impl<K, V> Extend<(K, V)> for RequestParameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl IntoIterator for RequestParameters {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_is_sorted() {
        let params: RequestParameters = [("b", "2"), ("a", "1"), ("B", "3")]
            .into_iter()
            .collect();

        let names: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["B", "a", "b"]);
    }

    #[test]
    fn test_insert_replaces() {
        let mut params = RequestParameters::for_action("SendEmail");
        assert_eq!(params.insert("Action", "GetSendQuota"), Some("SendEmail".to_string()));
        assert_eq!(params.action(), Some("GetSendQuota"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_member_indices_sort_bytewise() {
        let params: RequestParameters = (1..=10)
            .map(|i| (format!("Destination.ToAddresses.member.{}", i), "x"))
            .collect();

        let names: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(names[0], "Destination.ToAddresses.member.1");
        assert_eq!(names[1], "Destination.ToAddresses.member.10");
        assert_eq!(names[2], "Destination.ToAddresses.member.2");
    }

    #[test]
    fn test_empty() {
        let params = RequestParameters::new();
        assert!(params.is_empty());
        assert_eq!(params.get("Action"), None);
    }
}
