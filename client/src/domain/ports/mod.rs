//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod fixture_gateway;
mod subscription_gateway;

pub use fixture_gateway::FixtureSubscriptionGateway;
#[cfg(test)]
pub use subscription_gateway::MockSubscriptionGateway;
pub use subscription_gateway::{SubscriptionGateway, TransportFailure};
