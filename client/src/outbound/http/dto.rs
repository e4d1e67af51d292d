//! DTOs for the service's response envelopes.
//!
//! Collections arrive wrapped in a single-key object. A missing or `null`
//! array decodes as empty.

use serde::{Deserialize, Deserializer};

use crate::domain::{Member, Subscription};

#[derive(Debug, Deserialize)]
pub(super) struct SubscriptionsEnvelope {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub(super) subscriptions: Vec<Subscription>,
}

#[derive(Debug, Deserialize)]
pub(super) struct MembersEnvelope {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub(super) users: Vec<Member>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
