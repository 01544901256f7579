use std::fmt;

use thiserror::Error;

/// Error returned when a collection name cannot be used as a table name.
#[derive(Debug, Clone, Error)]
#[error("invalid collection name {0:?}: must be non-empty ASCII letters, digits or underscores, starting with a letter")]
pub struct InvalidCollectionName(pub String);

/// A validated collection name.
///
/// Collection names become PostgreSQL table names and are interpolated into
/// DDL statements (identifiers cannot be parameterised), so they are
/// restricted to `[a-zA-Z][a-zA-Z0-9_]*` to rule out SQL injection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Collection(String);

impl Collection {
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidCollectionName> {
        let name = name.into();
        let mut chars = name.chars();
        let valid = match chars.next() {
            Some(first) => {
                first.is_ascii_alphabetic()
                    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            None => false,
        };
        if valid {
            Ok(Self(name))
        } else {
            Err(InvalidCollectionName(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
