//! Behaviour tests for the session-expiry rule and account lifecycle.
//!
//! These scenarios drive the sync service against the in-memory gateway and
//! confirm how the mirrored user reacts to expired sessions, soft failures,
//! outages and account deletion.

use std::sync::Arc;

use client::domain::ports::{FixtureSubscriptionGateway, TransportFailure};
use client::domain::{
    DescriptorCode, ErrorDescriptor, SessionPolicy, StoreHandle, Subscription, SyncService, User,
    UserState,
};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use tokio::runtime::Runtime;

// -----------------------------------------------------------------------------
// Test World
// -----------------------------------------------------------------------------

/// Wrapper for non-Clone types to enable storage in `Slot`.
#[derive(Clone)]
struct RuntimeHandle(Arc<Runtime>);

type FixtureSync = SyncService<FixtureSubscriptionGateway>;

/// Test world holding the service under test and the last outcome.
#[derive(Default, ScenarioState)]
struct SessionWorld {
    runtime: Slot<RuntimeHandle>,
    gateway: Slot<Arc<FixtureSubscriptionGateway>>,
    sync: Slot<FixtureSync>,
    last_outcome: Slot<Result<(), ErrorDescriptor>>,
}

impl SessionWorld {
    fn sync(&self) -> FixtureSync {
        self.sync.get().expect("sync service should be set")
    }

    fn gateway(&self) -> Arc<FixtureSubscriptionGateway> {
        self.gateway.get().expect("gateway should be set")
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        let runtime = self.runtime.get().expect("runtime should be set");
        runtime.0.block_on(future)
    }

    fn last_outcome(&self) -> Result<(), ErrorDescriptor> {
        self.last_outcome.get().expect("an action should have run")
    }

    fn last_error(&self) -> ErrorDescriptor {
        self.last_outcome()
            .expect_err("the action should have failed")
    }
}

fn subscription(index: usize) -> Subscription {
    Subscription {
        id: index.to_string(),
        title: format!("Digest {index}"),
        day: "monday".to_owned(),
        email: "ada@example.com".to_owned(),
        members: Vec::new(),
    }
}

#[fixture]
fn world() -> SessionWorld {
    SessionWorld::default()
}

// -----------------------------------------------------------------------------
// Given Steps
// -----------------------------------------------------------------------------

#[given("a signed-in user with {count} subscriptions")]
fn a_signed_in_user_with_subscriptions(world: &SessionWorld, count: usize) {
    let gateway = Arc::new(
        FixtureSubscriptionGateway::default()
            .with_user(User {
                signed_in: true,
                name: "Ada".to_owned(),
                id: "u-1".to_owned(),
            })
            .with_subscriptions((1..=count).map(subscription).collect()),
    );
    let sync = SyncService::new(
        Arc::clone(&gateway),
        StoreHandle::default(),
        SessionPolicy::default(),
    );
    let runtime = Runtime::new().expect("create runtime");
    runtime.block_on(async {
        sync.load_user().await.expect("user loads");
        sync.load_subscriptions()
            .await
            .expect("subscriptions load");
    });
    assert!(sync.store().is_user_signed_in());

    world.runtime.set(RuntimeHandle(Arc::new(runtime)));
    world.gateway.set(gateway);
    world.sync.set(sync);
}

#[given("the service answers the next call with status {status}")]
fn the_service_answers_with_status(world: &SessionWorld, status: u16) {
    world
        .gateway()
        .fail_next(TransportFailure::http_failure(status, "", ""));
}

#[given("the network is down for the next call")]
fn the_network_is_down(world: &SessionWorld) {
    world
        .gateway()
        .fail_next(TransportFailure::network_fault(""));
}

// -----------------------------------------------------------------------------
// When Steps
// -----------------------------------------------------------------------------

#[when("the subscriptions are reloaded")]
fn the_subscriptions_are_reloaded(world: &SessionWorld) {
    let sync = world.sync();
    let outcome = world.block_on(async { sync.load_subscriptions().await.map(drop) });
    world.last_outcome.set(outcome);
}

#[when("the user is reloaded")]
fn the_user_is_reloaded(world: &SessionWorld) {
    let sync = world.sync();
    let outcome = world.block_on(async { sync.load_user().await.map(drop) });
    world.last_outcome.set(outcome);
}

#[when("the account is deleted")]
fn the_account_is_deleted(world: &SessionWorld) {
    let sync = world.sync();
    let outcome = world.block_on(async { sync.delete_account().await });
    world.last_outcome.set(outcome);
}

// -----------------------------------------------------------------------------
// Then Steps
// -----------------------------------------------------------------------------

#[then("the user is signed out")]
fn the_user_is_signed_out(world: &SessionWorld) {
    assert_eq!(world.sync().store().user(), UserState::SignedOut);
}

#[then("the user is still signed in")]
fn the_user_is_still_signed_in(world: &SessionWorld) {
    assert!(world.sync().store().is_user_signed_in());
}

#[then("the user record is the signed-out record")]
fn the_user_record_is_signed_out(world: &SessionWorld) {
    assert_eq!(
        world.sync().store().user(),
        UserState::Loaded(User::signed_out())
    );
}

#[then("the action reports code {code}")]
fn the_action_reports_code(world: &SessionWorld, code: i64) {
    assert_eq!(
        world.last_error().code(),
        Some(&DescriptorCode::Numeric(code))
    );
}

#[then("the action reports {message} without a code")]
fn the_action_reports_message_without_code(world: &SessionWorld, message: String) {
    let error = world.last_error();
    assert_eq!(error.code(), None);
    assert_eq!(error.message(), message.trim_matches('"'));
}

#[then("no error is reported")]
fn no_error_is_reported(world: &SessionWorld) {
    if let Err(error) = world.last_outcome() {
        panic!("expected success, got {error}");
    }
}

#[then("{count} subscriptions remain cached")]
fn subscriptions_remain_cached(world: &SessionWorld, count: usize) {
    assert_eq!(world.sync().store().subscriptions().len(), count);
}

#[then("a fresh user load reports a known sign-out")]
fn a_fresh_user_load_reports_sign_out(world: &SessionWorld) {
    let sync = world.sync();
    let state = world
        .block_on(async { sync.load_user().await })
        .expect("user load succeeds");
    assert_eq!(state, UserState::SignedOut);
}

// -----------------------------------------------------------------------------
// Scenario Bindings
// -----------------------------------------------------------------------------

#[scenario(
    path = "tests/features/session_expiry.feature",
    name = "An expired session during a reload signs the user out"
)]
fn expired_session_signs_out(world: SessionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/session_expiry.feature",
    name = "A missing user reads as signed out"
)]
fn missing_user_reads_as_signed_out(world: SessionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/session_expiry.feature",
    name = "A network outage keeps the session"
)]
fn network_outage_keeps_session(world: SessionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/session_expiry.feature",
    name = "Deleting the account clears local state"
)]
fn deleting_account_clears_state(world: SessionWorld) {
    let _ = world;
}
