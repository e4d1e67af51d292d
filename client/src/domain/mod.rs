//! Domain primitives, the cache store and the sync actions.
//!
//! Purpose: Mirror the signed-in user and their subscriptions from the
//! service, and keep every state change behind a single store. Types document
//! their invariants and serialisation contracts (serde) in their Rustdoc.
//!
//! Public surface:
//! - User, UserState: the signed-in user and what the store knows about it.
//! - Member, Subscription, SubscriptionDraft: digest subscriptions.
//! - ErrorDescriptor, DescriptorCode: the `{ code, message }` failure shape.
//! - normalize: total conversion from transport failures to descriptors.
//! - SessionPolicy: the session-expiry and soft-fail rules.
//! - CacheStore, Mutation, StoreHandle: mirrored state and its shared handle.
//! - SyncService, SyncResult: gateway call plus store mutation per action.

pub mod error;
pub mod normalizer;
pub mod ports;
pub mod session_policy;
pub mod store;
pub mod subscription;
pub mod sync_service;
pub mod user;

pub use self::error::{DescriptorCode, ErrorDescriptor};
pub use self::normalizer::{DEFAULT_ERROR_MESSAGE, normalize};
pub use self::session_policy::SessionPolicy;
pub use self::store::{CacheStore, Mutation, StoreHandle};
pub use self::subscription::{Member, Subscription, SubscriptionDraft};
pub use self::sync_service::{SyncResult, SyncService};
pub use self::user::{User, UserState};
