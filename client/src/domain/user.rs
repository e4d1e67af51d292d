//! Signed-in user as mirrored from the service.

use serde::{Deserialize, Serialize};

/// User record returned by `GET /user`.
///
/// The service answers with `signedIn: true` for a resolved session. A record
/// with `signedIn: false` is the definitive "nobody is signed in" fact.
///
/// # Examples
/// ```
/// use client::domain::User;
///
/// let user: User = serde_json::from_str(r#"{"signedIn":true,"name":"Ada","id":"42"}"#)
///     .expect("valid user JSON");
/// assert!(user.signed_in);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Whether the service resolved a session for this user.
    #[serde(default)]
    pub signed_in: bool,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Stable user identifier.
    #[serde(default)]
    pub id: String,
}

impl User {
    /// Record committed when the user could not be resolved.
    ///
    /// # Examples
    /// ```
    /// use client::domain::User;
    ///
    /// let user = User::signed_out();
    /// assert!(!user.signed_in);
    /// assert!(user.name.is_empty() && user.id.is_empty());
    /// ```
    #[must_use]
    pub fn signed_out() -> Self {
        Self {
            signed_in: false,
            name: String::new(),
            id: String::new(),
        }
    }
}

/// What the store knows about the current user.
///
/// The three states stay distinct: nothing loaded yet, a known sign-out, and
/// a loaded record (which may itself report `signed_in == false`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "user", rename_all = "snake_case")]
pub enum UserState {
    /// No load has completed yet.
    #[default]
    Unloaded,
    /// The session is known to be gone.
    SignedOut,
    /// A record was loaded from the service.
    Loaded(User),
}

impl UserState {
    /// `true` once any load or invalidation has completed.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        !matches!(self, Self::Unloaded)
    }

    /// `true` only for a loaded record whose session is live.
    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        matches!(self, Self::Loaded(user) if user.signed_in)
    }

    /// Borrow the loaded record, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::Loaded(user) => Some(user),
            Self::Unloaded | Self::SignedOut => None,
        }
    }
}

impl From<Option<User>> for UserState {
    /// `None` is the service's JSON `null`: a successful "no session" answer.
    fn from(value: Option<User>) -> Self {
        value.map_or(Self::SignedOut, Self::Loaded)
    }
}

impl From<User> for UserState {
    fn from(value: User) -> Self {
        Self::Loaded(value)
    }
}
