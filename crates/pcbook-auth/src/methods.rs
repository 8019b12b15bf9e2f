// ABOUTME: Static set of fully-qualified gRPC methods that require a bearer token.
// ABOUTME: Built once from a method -> bool map; membership is exact string match.

use std::collections::HashSet;

/// Methods whose calls get an `authorization` header attached.
///
/// Entries are full gRPC paths such as `/pcbook.LaptopService/CreateLaptop`.
/// There is no prefix or pattern matching: a method missing from the set,
/// including one misspelled in configuration, is sent unauthenticated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthMethods {
    methods: HashSet<String>,
}

impl AuthMethods {
    /// Build from a `method -> requires auth` map. Only `true` entries count.
    pub fn from_config<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, bool)>,
        K: Into<String>,
    {
        let methods = entries
            .into_iter()
            .filter(|(_, required)| *required)
            .map(|(method, _)| method.into())
            .collect();
        Self { methods }
    }

    pub fn requires_auth(&self, method: &str) -> bool {
        self.methods.contains(method)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for AuthMethods {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            methods: iter.into_iter().map(Into::into).collect(),
        }
    }
}
