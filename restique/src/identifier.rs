//! SQL identifier validation
//!
//! SQLite cannot bind identifiers as query parameters, so table names are
//! interpolated into SQL text directly. Names are therefore restricted to
//! ASCII letters, digits and underscores; no quoting is attempted.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::database::traits::DatabaseError;

/// Check whether `candidate` is safe to interpolate into SQL text
///
/// Returns `true` only for non-empty strings made up entirely of
/// `[A-Za-z0-9_]`.
pub fn is_valid_identifier(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || byte == b'_')
}

/// A table name that has passed [`is_valid_identifier`]
///
/// Every table-dependent database operation takes a `&TableName`, so the
/// only way to reach SQL text is through the validator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TableName(String);

impl TableName {
    /// Validate `name` and wrap it
    pub fn new(name: impl Into<String>) -> Result<Self, DatabaseError> {
        let name = name.into();
        if is_valid_identifier(&name) {
            Ok(Self(name))
        } else {
            Err(DatabaseError::InvalidIdentifier(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for TableName {
    type Err = DatabaseError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::new(name)
    }
}

impl TryFrom<String> for TableName {
    type Error = DatabaseError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}
