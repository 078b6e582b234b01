use std::collections::BTreeMap;

/// An explicit name → value view of an environment.
///
/// Verification and tagging read from a snapshot instead of the live
/// process environment, so tests and task definitions plug in the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current process environment. Non-UTF-8 entries are
    /// converted lossily.
    pub fn from_process() -> Self {
        std::env::vars_os()
            .map(|(k, v)| {
                (
                    k.to_string_lossy().into_owned(),
                    v.to_string_lossy().into_owned(),
                )
            })
            .collect()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect()
    }

    /// Names with empty values; for sources that only list names
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .map(|name| (name.into(), String::new()))
            .collect()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Presence only; an empty value still counts as set
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }
}

impl FromIterator<(String, String)> for EnvSnapshot {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_value_counts_as_present() {
        let env = EnvSnapshot::from_pairs([("A", ""), ("B", "1")]);
        assert!(env.contains("A"));
        assert_eq!(env.get("B"), Some("1"));
        assert!(!env.contains("a"));
    }

    #[test]
    fn test_from_names() {
        let env = EnvSnapshot::from_names(["X", "Y"]);
        assert_eq!(env.names().collect::<Vec<_>>(), vec!["X", "Y"]);
        assert_eq!(env.get("X"), Some(""));
    }

    #[test]
    fn test_from_process_sees_path_like_variables() {
        let env = EnvSnapshot::from_process();
        assert_eq!(env.len(), std::env::vars_os().count());
    }
}
