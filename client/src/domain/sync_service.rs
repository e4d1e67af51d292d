//! Sync actions: one gateway call, then zero or more store mutations.
//!
//! Every action follows the same protocol. It calls the gateway, normalises
//! any failure, classifies it with the [`SessionPolicy`], and commits the
//! resulting mutations. An expired session signs the user out whichever
//! action observed it, and the error is still returned to the caller.
//!
//! Actions are not serialised against each other. When two are in flight the
//! store ends in whatever order their responses arrive; callers that need
//! ordering await one action before starting the next.

use std::sync::Arc;

use tracing::{info, warn};

use super::ports::{SubscriptionGateway, TransportFailure};
use super::store::{Mutation, StoreHandle};
use super::{
    ErrorDescriptor, Member, SessionPolicy, Subscription, SubscriptionDraft, User, UserState,
};

/// Outcome of every sync action.
pub type SyncResult<T> = Result<T, ErrorDescriptor>;

/// Orchestrates gateway calls and store mutations.
pub struct SyncService<G> {
    gateway: Arc<G>,
    store: StoreHandle,
    policy: SessionPolicy,
}

impl<G> Clone for SyncService<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            store: self.store.clone(),
            policy: self.policy.clone(),
        }
    }
}

impl<G> SyncService<G> {
    /// Create a service over `gateway` that commits into `store`.
    #[must_use]
    pub const fn new(gateway: Arc<G>, store: StoreHandle, policy: SessionPolicy) -> Self {
        Self {
            gateway,
            store,
            policy,
        }
    }

    /// Handle to the store this service writes to.
    #[must_use]
    pub const fn store(&self) -> &StoreHandle {
        &self.store
    }

    /// Normalise `failure` and apply the session-expiry rule.
    fn fail(&self, action: &'static str, failure: &TransportFailure) -> ErrorDescriptor {
        let error = ErrorDescriptor::from(failure);
        warn!(
            action,
            code = ?error.code(),
            message = error.message(),
            "sync action failed"
        );
        if self.policy.is_session_expired(&error) {
            info!(action, "session expired; signing out");
            self.store.commit([Mutation::SetUser(UserState::SignedOut)]);
        }
        error
    }
}

impl<G> SyncService<G>
where
    G: SubscriptionGateway,
{
    /// Load the current user.
    ///
    /// A failure the policy deems "user not resolvable" is not reported as
    /// an error: a 401 among them signs out through the session-expiry rule,
    /// the rest become a signed-out record. Any other expired session signs
    /// out and is still returned. Remaining failures leave the store
    /// untouched.
    pub async fn load_user(&self) -> SyncResult<UserState> {
        let failure = match self.gateway.fetch_user().await {
            Ok(user) => {
                let state = UserState::from(user);
                self.store.commit([Mutation::SetUser(state.clone())]);
                return Ok(state);
            }
            Err(failure) => failure,
        };

        let error = ErrorDescriptor::from(&failure);
        let unresolvable = self.policy.is_user_unresolvable(&error);
        if self.policy.is_session_expired(&error) {
            info!(code = ?error.code(), "no session on user load");
            self.store.commit([Mutation::SetUser(UserState::SignedOut)]);
            return if unresolvable {
                Ok(UserState::SignedOut)
            } else {
                warn!(code = ?error.code(), message = error.message(), "user load failed");
                Err(error)
            };
        }
        if unresolvable {
            info!(code = ?error.code(), "user not resolvable; treating as signed out");
            let state = UserState::Loaded(User::signed_out());
            self.store.commit([Mutation::SetUser(state.clone())]);
            return Ok(state);
        }
        warn!(code = ?error.code(), message = error.message(), "user load failed");
        Err(error)
    }

    /// Load and replace the subscriptions collection.
    pub async fn load_subscriptions(&self) -> SyncResult<Vec<Subscription>> {
        let subscriptions = self
            .gateway
            .fetch_subscriptions()
            .await
            .map_err(|failure| self.fail("load_subscriptions", &failure))?;
        self.store
            .commit([Mutation::SetSubscriptions(subscriptions.clone())]);
        Ok(subscriptions)
    }

    /// Create a subscription. The local collection is left as is; reload or
    /// use the returned value.
    pub async fn create_subscription(
        &self,
        draft: &SubscriptionDraft,
    ) -> SyncResult<Subscription> {
        self.gateway
            .create_subscription(draft)
            .await
            .map_err(|failure| self.fail("create_subscription", &failure))
    }

    /// Update a subscription. The local collection is left as is; reload or
    /// use the returned value.
    pub async fn update_subscription(
        &self,
        subscription: &Subscription,
    ) -> SyncResult<Subscription> {
        self.gateway
            .update_subscription(subscription)
            .await
            .map_err(|failure| self.fail("update_subscription", &failure))
    }

    /// Delete a subscription and drop it from the collection.
    pub async fn delete_subscription(&self, subscription: &Subscription) -> SyncResult<()> {
        self.gateway
            .delete_subscription(&subscription.id)
            .await
            .map_err(|failure| self.fail("delete_subscription", &failure))?;
        self.store
            .commit([Mutation::RemoveSubscription(subscription.id.clone())]);
        Ok(())
    }

    /// Delete the account and tear down all local state.
    pub async fn delete_account(&self) -> SyncResult<()> {
        self.gateway
            .delete_account()
            .await
            .map_err(|failure| self.fail("delete_account", &failure))?;
        self.store.commit([
            Mutation::SetUser(UserState::SignedOut),
            Mutation::SetSubscriptions(Vec::new()),
        ]);
        Ok(())
    }

    /// Search accounts that can be added as members. Never mutates the store
    /// on success.
    pub async fn search_members(&self, query: &str) -> SyncResult<Vec<Member>> {
        self.gateway
            .search_members(query)
            .await
            .map_err(|failure| self.fail("search_members", &failure))
    }
}

#[cfg(test)]
#[path = "sync_service_tests.rs"]
mod tests;
