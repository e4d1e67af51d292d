//! Subscriptions owned by the signed-in user.
//!
//! A subscription is a scheduled digest: on `day`, the service mails the
//! recent activity of every listed member to `email`.

use serde::{Deserialize, Serialize};

/// Account whose activity is included in a subscription digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Provider account identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Provider handle, when the service supplies it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_name: Option<String>,
    /// Avatar URL, when the service supplies it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

impl Member {
    /// Construct a member with only the identifying fields.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            screen_name: None,
            profile_image_url: None,
        }
    }
}

/// Subscription as stored by the service.
///
/// `id` is the identity: the store never holds two entries with the same id.
/// Members travel as `userList` on the wire; `members` is accepted on input.
///
/// # Examples
/// ```
/// use client::domain::Subscription;
///
/// let body = r#"{"id":"7","title":"Weekly","day":"monday","email":"a@b.c","userList":[]}"#;
/// let subscription: Subscription = serde_json::from_str(body).expect("valid JSON");
/// assert_eq!(subscription.id, "7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Stable identifier assigned by the service.
    pub id: String,
    /// Human readable title.
    pub title: String,
    /// Delivery weekday, e.g. `monday`.
    pub day: String,
    /// Delivery address.
    pub email: String,
    /// Members in display order.
    #[serde(rename = "userList", alias = "members", default)]
    pub members: Vec<Member>,
}

/// Payload for creating a subscription; the service assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionDraft {
    /// Human readable title.
    pub title: String,
    /// Delivery weekday.
    pub day: String,
    /// Delivery address.
    pub email: String,
    /// Members in display order.
    #[serde(rename = "userList", alias = "members", default)]
    pub members: Vec<Member>,
}

impl From<Subscription> for SubscriptionDraft {
    fn from(value: Subscription) -> Self {
        let Subscription {
            title,
            day,
            email,
            members,
            ..
        } = value;
        Self {
            title,
            day,
            email,
            members,
        }
    }
}
