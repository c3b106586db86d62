//! Key paths: the sequence of keys naming a walk from the root to some node.
//!
//! The textual form joins keys with `/`, e.g. `etc/pi/ro/opt`. The first key names the root.

use alloc::{string::String, vec::Vec};
use core::{convert::Infallible, fmt, str::FromStr};

/// The separator between keys in the textual form of a [`KeyPath`].
pub const SEPARATOR: char = '/';

/// An ordered, non-empty sequence of keys from the root to a target node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    // Never empty.
    keys: Vec<String>,
}

impl KeyPath {
    /// Parse a `/`-delimited path. Every string parses; empty segments are kept as empty keys.
    pub fn parse(path: &str) -> Self {
        KeyPath {
            keys: path.split(SEPARATOR).map(String::from).collect(),
        }
    }

    /// Build a path from a sequence of keys. Returns `None` if the sequence is empty.
    pub fn from_keys<I, K>(keys: I) -> Option<Self>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        if keys.is_empty() {
            None
        } else {
            Some(KeyPath { keys })
        }
    }

    /// All keys, root first.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// The key naming the root.
    pub fn root_key(&self) -> &str {
        &self.keys[0]
    }

    /// The key naming the target node.
    pub fn terminal(&self) -> &str {
        &self.keys[self.keys.len() - 1]
    }

    /// The level of the target node, which is the number of steps below the root.
    pub fn depth(&self) -> usize {
        self.keys.len() - 1
    }
}

impl FromStr for KeyPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(KeyPath::parse(s))
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", SEPARATOR)?;
            }
            f.write_str(key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::KeyPath;

    #[test]
    fn parse_and_display() {
        let path = KeyPath::parse("etc/pi/ro/opt");
        assert_eq!(path.keys(), &["etc", "pi", "ro", "opt"]);
        assert_eq!(path.root_key(), "etc");
        assert_eq!(path.terminal(), "opt");
        assert_eq!(path.depth(), 3);
        assert_eq!(path.to_string(), "etc/pi/ro/opt");
    }

    #[test]
    fn root_only() {
        let path: KeyPath = "etc".parse().unwrap();
        assert_eq!(path.depth(), 0);
        assert_eq!(path.terminal(), "etc");
    }

    #[test]
    fn empty_string_is_a_single_empty_key() {
        let path = KeyPath::parse("");
        assert_eq!(path.keys(), &[""]);
        assert_eq!(path.depth(), 0);
    }

    #[test]
    fn from_keys_rejects_empty() {
        assert!(KeyPath::from_keys(Vec::<&str>::new()).is_none());
        let path = KeyPath::from_keys(["etc", "chi"]).unwrap();
        assert_eq!(path, KeyPath::parse("etc/chi"));
    }
}
