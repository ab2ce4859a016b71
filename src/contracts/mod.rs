//! Contract bindings
//!
//! Alloy-generated bindings for the externally deployed contracts this crate
//! talks to. Both are pre-deployed; nothing here deploys or upgrades them.
//!
//! - [`Erc20Contract`](erc20::Erc20Contract): the collateral token
//! - [`TokenRouterContract`](token_router::TokenRouterContract): the cross-chain router

pub mod erc20;
pub mod token_router;
