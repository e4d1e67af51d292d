//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **http**: the subscription service over JSON/HTTP using reqwest
//!
//! Adapters are thin translators between domain types and wire
//! representations. They contain no business logic.

pub mod http;
