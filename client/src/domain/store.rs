//! Cache store: the only place mirrored state changes.
//!
//! [`CacheStore`] is a plain record with pure getters. Every change goes
//! through [`CacheStore::apply`] with a [`Mutation`]. [`StoreHandle`] is the
//! shared handle constructed once and injected into whichever components need
//! it; it serialises access with a lock that is never held across an await,
//! and publishes a revision number after every committed mutation.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;
use indexmap::map::Entry;
use tokio::sync::watch;
use tracing::debug;

use super::{Subscription, UserState};

/// A single state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Replace the user state wholesale.
    SetUser(UserState),
    /// Replace the whole subscriptions collection.
    SetSubscriptions(Vec<Subscription>),
    /// Insert unless an entry with the same id exists.
    AddSubscription(Subscription),
    /// Remove the entry with this id, if present.
    RemoveSubscription(String),
}

impl Mutation {
    const fn name(&self) -> &'static str {
        match self {
            Self::SetUser(_) => "set_user",
            Self::SetSubscriptions(_) => "set_subscriptions",
            Self::AddSubscription(_) => "add_subscription",
            Self::RemoveSubscription(_) => "remove_subscription",
        }
    }
}

/// Mirrored user and subscriptions.
///
/// ## Invariants
/// - No two subscriptions share an `id`.
/// - Subscriptions keep insertion order.
/// - Derived values are computed on read and never stored.
///
/// # Examples
/// ```
/// use client::domain::{CacheStore, Subscription};
///
/// let mut store = CacheStore::default();
/// let subscription = Subscription {
///     id: "1".to_owned(),
///     title: "Weekly".to_owned(),
///     day: "monday".to_owned(),
///     email: "ada@example.com".to_owned(),
///     members: Vec::new(),
/// };
/// assert!(store.add_subscription(subscription.clone()));
/// assert!(!store.add_subscription(subscription));
/// assert_eq!(store.subscriptions().count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStore {
    user: UserState,
    subscriptions: IndexMap<String, Subscription>,
}

impl CacheStore {
    /// Current user state.
    #[must_use]
    pub const fn user(&self) -> &UserState {
        &self.user
    }

    /// `true` unless no user load or invalidation has happened yet.
    #[must_use]
    pub const fn is_user_loaded(&self) -> bool {
        self.user.is_loaded()
    }

    /// `true` for a loaded user whose session is live.
    #[must_use]
    pub const fn is_user_signed_in(&self) -> bool {
        self.user.is_signed_in()
    }

    /// Subscriptions in insertion order.
    pub fn subscriptions(&self) -> impl ExactSizeIterator<Item = &Subscription> {
        self.subscriptions.values()
    }

    /// Look up a subscription by id.
    #[must_use]
    pub fn subscription(&self, id: &str) -> Option<&Subscription> {
        self.subscriptions.get(id)
    }

    /// The email used by the most subscriptions, or `""` when there are none.
    ///
    /// Subscriptions are grouped by email in order of first appearance and
    /// the groups are stably ordered by size; the last group wins. Among
    /// emails tied for the largest count, that is the one whose first
    /// subscription appears latest.
    ///
    /// # Examples
    /// ```
    /// use client::domain::{CacheStore, Subscription};
    ///
    /// let with_email = |id: &str, email: &str| Subscription {
    ///     id: id.to_owned(),
    ///     title: String::new(),
    ///     day: "monday".to_owned(),
    ///     email: email.to_owned(),
    ///     members: Vec::new(),
    /// };
    /// let mut store = CacheStore::default();
    /// store.set_subscriptions(vec![with_email("1", "a"), with_email("2", "b")]);
    /// assert_eq!(store.dominant_email(), "b");
    /// ```
    #[must_use]
    pub fn dominant_email(&self) -> &str {
        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for subscription in self.subscriptions.values() {
            *counts.entry(subscription.email.as_str()).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .fold(None, |best: Option<(&str, usize)>, (email, count)| match best {
                Some((_, best_count)) if best_count > count => best,
                _ => Some((email, count)),
            })
            .map_or("", |(email, _)| email)
    }

    /// Apply one mutation. Returns whether state changed.
    pub fn apply(&mut self, mutation: Mutation) -> bool {
        match mutation {
            Mutation::SetUser(user) => {
                let changed = self.user != user;
                self.user = user;
                changed
            }
            Mutation::SetSubscriptions(list) => {
                let mut subscriptions: IndexMap<String, Subscription> =
                    IndexMap::with_capacity(list.len());
                for subscription in list {
                    if let Entry::Vacant(slot) = subscriptions.entry(subscription.id.clone()) {
                        slot.insert(subscription);
                    }
                }
                let changed = !self.subscriptions.iter().eq(subscriptions.iter());
                self.subscriptions = subscriptions;
                changed
            }
            Mutation::AddSubscription(subscription) => {
                match self.subscriptions.entry(subscription.id.clone()) {
                    Entry::Vacant(slot) => {
                        slot.insert(subscription);
                        true
                    }
                    Entry::Occupied(_) => false,
                }
            }
            Mutation::RemoveSubscription(id) => self.subscriptions.shift_remove(&id).is_some(),
        }
    }

    /// Replace the user state. `UserState::SignedOut` is the known sign-out,
    /// `UserState::Unloaded` resets to "not loaded".
    pub fn set_user(&mut self, user: impl Into<UserState>) -> bool {
        self.apply(Mutation::SetUser(user.into()))
    }

    /// Replace the collection. Later duplicates of an id are dropped.
    pub fn set_subscriptions(&mut self, list: Vec<Subscription>) -> bool {
        self.apply(Mutation::SetSubscriptions(list))
    }

    /// Insert `subscription` when present and its id is unused.
    pub fn add_subscription(&mut self, subscription: impl Into<Option<Subscription>>) -> bool {
        subscription
            .into()
            .is_some_and(|entry| self.apply(Mutation::AddSubscription(entry)))
    }

    /// Remove the entry sharing `subscription`'s id.
    pub fn remove_subscription(&mut self, subscription: &Subscription) -> bool {
        self.apply(Mutation::RemoveSubscription(subscription.id.clone()))
    }
}

/// Shared, injectable handle to a [`CacheStore`].
///
/// Cloning the handle shares the same store.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    inner: Arc<RwLock<CacheStore>>,
    revision: Arc<watch::Sender<u64>>,
}

impl Default for StoreHandle {
    fn default() -> Self {
        Self::new(CacheStore::default())
    }
}

impl StoreHandle {
    /// Wrap an initial store.
    #[must_use]
    pub fn new(store: CacheStore) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(RwLock::new(store)),
            revision: Arc::new(revision),
        }
    }

    /// Run `f` against the current state.
    #[must_use]
    pub fn read<R>(&self, f: impl FnOnce(&CacheStore) -> R) -> R {
        f(&self.read_guard())
    }

    /// Commit mutations in order under one lock acquisition.
    ///
    /// The revision advances once if any of them changed state.
    pub fn commit(&self, mutations: impl IntoIterator<Item = Mutation>) -> bool {
        let changed = {
            let mut store = self.write_guard();
            mutations.into_iter().fold(false, |changed, mutation| {
                let name = mutation.name();
                let applied = store.apply(mutation);
                debug!(mutation = name, changed = applied, "store mutation committed");
                changed | applied
            })
        };
        if changed {
            self.revision.send_modify(|revision| *revision += 1);
        }
        changed
    }

    /// Receiver notified with the new revision after each change.
    #[must_use]
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Number of committed changes so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Copy of the user state.
    #[must_use]
    pub fn user(&self) -> UserState {
        self.read(|store| store.user().clone())
    }

    /// See [`CacheStore::is_user_loaded`].
    #[must_use]
    pub fn is_user_loaded(&self) -> bool {
        self.read(CacheStore::is_user_loaded)
    }

    /// See [`CacheStore::is_user_signed_in`].
    #[must_use]
    pub fn is_user_signed_in(&self) -> bool {
        self.read(CacheStore::is_user_signed_in)
    }

    /// Copy of the subscriptions in insertion order.
    #[must_use]
    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.read(|store| store.subscriptions().cloned().collect())
    }

    /// See [`CacheStore::dominant_email`].
    #[must_use]
    pub fn dominant_email(&self) -> String {
        self.read(|store| store.dominant_email().to_owned())
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, CacheStore> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, CacheStore> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
