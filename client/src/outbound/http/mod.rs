//! HTTP outbound adapters.
//!
//! This module provides the reqwest implementation of the
//! `SubscriptionGateway` port.

mod dto;
mod gateway;

pub use gateway::{GatewayBuildError, HttpSubscriptionGateway};
