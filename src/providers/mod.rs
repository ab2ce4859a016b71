//! Production implementations of the gateway traits.
//!
//! This module provides the "real" implementation of the traits defined in
//! [`crate::traits`], talking to actual chains over JSON-RPC.
//!
//! Applications will typically use [`AlloyGateway`], while test code uses
//! [`FakeGateway`](crate::testing::FakeGateway).

mod alloy;

pub use self::alloy::AlloyGateway;
