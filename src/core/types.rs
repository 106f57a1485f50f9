//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Oid`] - Git object identifier (SHA)
//! - [`CommitIdentity`] - Validated author name and email for commits
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use modelkeep::core::types::{CommitIdentity, Oid};
//!
//! // Valid constructions
//! let oid = Oid::new("abc123def4567890abc123def4567890abc12345").unwrap();
//! let who = CommitIdentity::new("Ada Lovelace", "ada@example.com").unwrap();
//!
//! // Invalid constructions fail at creation time
//! assert!(Oid::new("not-a-sha").is_err());
//! assert!(CommitIdentity::new("", "ada@example.com").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid object id: {0}")]
    InvalidOid(String),

    #[error("invalid commit identity: {0}")]
    InvalidIdentity(String),
}

/// A Git object identifier (SHA-1 or SHA-256).
///
/// OIDs are normalized to lowercase for consistency.
///
/// # Example
///
/// ```
/// use modelkeep::core::types::Oid;
///
/// // Create from hex string (normalized to lowercase)
/// let oid = Oid::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
/// assert_eq!(oid.as_str(), "abc123def4567890abc123def4567890abc12345");
///
/// // Get abbreviated form
/// assert_eq!(oid.short(7), "abc123d");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Oid(String);

impl Oid {
    /// Create a new validated object id.
    ///
    /// The OID is normalized to lowercase.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOid` if the string is not a valid hex OID.
    pub fn new(oid: impl Into<String>) -> Result<Self, TypeError> {
        let oid = oid.into().to_ascii_lowercase();
        Self::validate(&oid)?;
        Ok(Self(oid))
    }

    /// Get an abbreviated form of the OID.
    ///
    /// Returns the first `len` characters. If `len` exceeds the OID length,
    /// returns the full OID.
    pub fn short(&self, len: usize) -> &str {
        let end = len.min(self.0.len());
        &self.0[..end]
    }

    /// Validate an object id.
    fn validate(oid: &str) -> Result<(), TypeError> {
        // SHA-1 is 40 hex chars, SHA-256 is 64
        if oid.len() != 40 && oid.len() != 64 {
            return Err(TypeError::InvalidOid(format!(
                "expected 40 or 64 hex characters, got {}",
                oid.len()
            )));
        }
        if !oid.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidOid(
                "object id must be hexadecimal".into(),
            ));
        }
        Ok(())
    }

    /// Get the object id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Oid {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Oid> for String {
    fn from(oid: Oid) -> Self {
        oid.0
    }
}

impl AsRef<str> for Oid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Oid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated author identity for commits.
///
/// Both the name and the email must be non-empty after trimming and must
/// not contain line breaks or angle brackets, which would corrupt the
/// commit header.
///
/// # Example
///
/// ```
/// use modelkeep::core::types::CommitIdentity;
///
/// let who = CommitIdentity::new("Ada Lovelace", "ada@example.com").unwrap();
/// assert_eq!(who.name(), "Ada Lovelace");
/// assert_eq!(who.email(), "ada@example.com");
///
/// assert!(CommitIdentity::new("Ada", "").is_err());
/// assert!(CommitIdentity::new("Ada\nLovelace", "ada@example.com").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitIdentity {
    name: String,
    email: String,
}

impl CommitIdentity {
    /// Create a new validated identity.
    ///
    /// Leading and trailing whitespace is trimmed from both fields.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidIdentity` if either field is empty after
    /// trimming or contains a forbidden character.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into().trim().to_string();
        let email = email.into().trim().to_string();

        if name.is_empty() {
            return Err(TypeError::InvalidIdentity("name cannot be empty".into()));
        }
        if email.is_empty() {
            return Err(TypeError::InvalidIdentity("email cannot be empty".into()));
        }

        const FORBIDDEN: [char; 4] = ['\n', '\r', '<', '>'];
        for field in [&name, &email] {
            if field.chars().any(|c| FORBIDDEN.contains(&c)) {
                return Err(TypeError::InvalidIdentity(
                    "identity cannot contain line breaks or angle brackets".into(),
                ));
            }
        }

        Ok(Self { name, email })
    }

    /// Get the author name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the author email.
    pub fn email(&self) -> &str {
        &self.email
    }
}

impl std::fmt::Display for CommitIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}
