//! In-memory gateway used by UI development builds and behaviour tests.
//!
//! It behaves like a well-mannered service: ids are assigned on create,
//! updates replace by id, deletes remove. Failures can be queued so callers
//! can rehearse expired sessions or outages without a network.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::{Member, Subscription, SubscriptionDraft, User};

use super::{SubscriptionGateway, TransportFailure};

#[derive(Debug, Default)]
struct FixtureState {
    user: Option<User>,
    subscriptions: Vec<Subscription>,
    directory: Vec<Member>,
    failures: VecDeque<TransportFailure>,
    next_id: u64,
    calls: Vec<String>,
}

/// Scriptable in-memory [`SubscriptionGateway`].
///
/// # Examples
/// ```
/// use client::domain::ports::{FixtureSubscriptionGateway, SubscriptionGateway};
/// use client::domain::User;
///
/// # tokio_test_block_on(async {
/// let gateway = FixtureSubscriptionGateway::default().with_user(User {
///     signed_in: true,
///     name: "Ada".to_owned(),
///     id: "1".to_owned(),
/// });
/// let user = gateway.fetch_user().await.expect("fixture answers");
/// assert!(user.is_some_and(|user| user.signed_in));
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().expect("runtime").block_on(f)
/// # }
/// ```
#[derive(Debug, Default)]
pub struct FixtureSubscriptionGateway {
    state: Mutex<FixtureState>,
}

impl FixtureSubscriptionGateway {
    /// Seed the user returned by `fetch_user`.
    #[must_use]
    pub fn with_user(self, user: User) -> Self {
        self.lock().user = Some(user);
        self
    }

    /// Seed the stored subscriptions.
    #[must_use]
    pub fn with_subscriptions(self, subscriptions: Vec<Subscription>) -> Self {
        self.lock().subscriptions = subscriptions;
        self
    }

    /// Seed the accounts returned by `search_members`.
    #[must_use]
    pub fn with_directory(self, members: Vec<Member>) -> Self {
        self.lock().directory = members;
        self
    }

    /// Make the next call fail with `failure`; queued failures are consumed
    /// in order, one per call.
    pub fn fail_next(&self, failure: TransportFailure) {
        self.lock().failures.push_back(failure);
    }

    /// Names of the operations called so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Subscriptions currently held by the fixture service.
    #[must_use]
    pub fn stored_subscriptions(&self) -> Vec<Subscription> {
        self.lock().subscriptions.clone()
    }

    fn lock(&self) -> MutexGuard<'_, FixtureState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the call and pop a queued failure, if any.
    fn begin(&self, operation: &str) -> Result<MutexGuard<'_, FixtureState>, TransportFailure> {
        let mut state = self.lock();
        state.calls.push(operation.to_owned());
        match state.failures.pop_front() {
            Some(failure) => Err(failure),
            None => Ok(state),
        }
    }
}

fn not_found(what: &str) -> TransportFailure {
    TransportFailure::http_failure(
        404_u16,
        "Not Found",
        format!(r#"{{"code":"not_found","message":"{what} not found"}}"#),
    )
}

#[async_trait]
impl SubscriptionGateway for FixtureSubscriptionGateway {
    async fn fetch_user(&self) -> Result<Option<User>, TransportFailure> {
        let state = self.begin("fetch_user")?;
        Ok(state.user.clone())
    }

    async fn fetch_subscriptions(&self) -> Result<Vec<Subscription>, TransportFailure> {
        let state = self.begin("fetch_subscriptions")?;
        Ok(state.subscriptions.clone())
    }

    async fn create_subscription(
        &self,
        draft: &SubscriptionDraft,
    ) -> Result<Subscription, TransportFailure> {
        let mut state = self.begin("create_subscription")?;
        state.next_id += 1;
        let created = Subscription {
            id: format!("fixture-{}", state.next_id),
            title: draft.title.clone(),
            day: draft.day.clone(),
            email: draft.email.clone(),
            members: draft.members.clone(),
        };
        state.subscriptions.push(created.clone());
        Ok(created)
    }

    async fn update_subscription(
        &self,
        subscription: &Subscription,
    ) -> Result<Subscription, TransportFailure> {
        let mut state = self.begin("update_subscription")?;
        let stored = state
            .subscriptions
            .iter_mut()
            .find(|stored| stored.id == subscription.id)
            .ok_or_else(|| not_found("subscription"))?;
        *stored = subscription.clone();
        Ok(subscription.clone())
    }

    async fn delete_subscription(&self, id: &str) -> Result<(), TransportFailure> {
        let mut state = self.begin("delete_subscription")?;
        let before = state.subscriptions.len();
        state.subscriptions.retain(|stored| stored.id != id);
        if state.subscriptions.len() == before {
            return Err(not_found("subscription"));
        }
        Ok(())
    }

    async fn delete_account(&self) -> Result<(), TransportFailure> {
        let mut state = self.begin("delete_account")?;
        if state.user.take().is_none() {
            return Err(not_found("user"));
        }
        state.subscriptions.clear();
        Ok(())
    }

    async fn search_members(&self, query: &str) -> Result<Vec<Member>, TransportFailure> {
        let state = self.begin("search_members")?;
        let needle = query.trim().to_lowercase();
        Ok(state
            .directory
            .iter()
            .filter(|member| {
                member.name.to_lowercase().contains(&needle)
                    || member
                        .screen_name
                        .as_deref()
                        .is_some_and(|handle| handle.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }
}
