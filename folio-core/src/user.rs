//! User identity used to key cached state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Key used when no authenticated identity is available.
pub const GUEST_USER_KEY: &str = "guest";

/// Identity string scoping cached recommendations.
///
/// Blank identities collapse to [`GUEST_USER_KEY`].
///
/// # Examples
/// ```
/// use folio_core::UserKey;
///
/// assert_eq!(UserKey::new("uid-42").as_str(), "uid-42");
/// assert!(UserKey::new("  ").is_guest());
/// assert_eq!(
///     UserKey::from_identity(None, Some("reader@example.com")).as_str(),
///     "reader@example.com"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserKey(String);

impl UserKey {
    /// Build a key from an identity string.
    pub fn new(identity: impl Into<String>) -> Self {
        let raw = identity.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::guest()
        } else if trimmed.len() == raw.len() {
            Self(raw)
        } else {
            Self(trimmed.to_owned())
        }
    }

    /// The shared key for unauthenticated sessions.
    #[must_use]
    pub fn guest() -> Self {
        Self(GUEST_USER_KEY.to_owned())
    }

    /// Pick the first usable identity: account id, then email, then guest.
    #[must_use]
    pub fn from_identity(uid: Option<&str>, email: Option<&str>) -> Self {
        uid.into_iter()
            .chain(email)
            .map(str::trim)
            .find(|candidate| !candidate.is_empty())
            .map_or_else(Self::guest, Self::new)
    }

    /// Borrow the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Report whether this is the guest key.
    #[must_use]
    pub fn is_guest(&self) -> bool {
        self.0 == GUEST_USER_KEY
    }
}

impl Default for UserKey {
    fn default() -> Self {
        Self::guest()
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
