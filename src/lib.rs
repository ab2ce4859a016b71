//! # warp-bridge
//!
//! A Rust SDK for moving ERC20 tokens between EVM chains through TokenRouter
//! contracts and a messaging mailbox.
//!
//! The library validates a transfer against live chain state before anything
//! is signed, then runs the approve, quote and send sequence and locates the
//! mailbox message id in the resulting receipt.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use warp_bridge::{AlloyGateway, BridgeConfig, BridgeError, BridgeService, TransferRequest};
//!
//! # async fn example() -> Result<(), BridgeError> {
//! let config = BridgeConfig::from_path("bridge.json")?;
//! let service = BridgeService::builder()
//!     .config(config)
//!     .gateway(AlloyGateway::new())
//!     .build();
//!
//! let request = TransferRequest::builder()
//!     .token("USDC")
//!     .origin("sepolia")
//!     .destination("basesepolia")
//!     .receiver("0x70997970C51812dc3A010C7d01b50e0d17dc79C8")
//!     .sender(warp_bridge::credential_from_env("PRIVATE_KEY")?)
//!     .amount("1.5")
//!     .build();
//!
//! // Read-only: fails with "Transfer precheck failed: ..." on the first problem
//! let report = service.precheck(&request).await?;
//! println!("fee: {} wei to domain {}", report.fee, report.destination_domain);
//!
//! let outcome = service.transfer(&request).await?;
//! println!("tx {} message {:?}", outcome.tx_hash, outcome.message_id);
//! # Ok(())
//! # }
//! ```
//!
//! ## Direct Contract Access
//!
//! ```rust,no_run
//! use warp_bridge::TokenRouterContract;
//! use alloy_primitives::address;
//! use alloy_provider::ProviderBuilder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = ProviderBuilder::new().connect("http://localhost:8545").await?;
//! let router = TokenRouterContract::new(
//!     address!("9f3B8679c73C2Fef8b59B4f3444d4e156fb70AA5"),
//!     provider,
//! );
//! let fee = router.quote_gas_payment(84532).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Public API
//!
//! - [`BridgeService`] - precheck and transfer pipelines
//! - [`BridgeConfig`] and [`ChainDescriptor`] - static chain and asset configuration
//! - [`TransferRequest`], [`PrecheckReport`] and [`TransferOutcome`] - pipeline inputs and outputs
//! - [`AlloyGateway`] - production gateway; [`testing::FakeGateway`] for tests
//! - [`BridgeError`] and [`Result`] - error types
//! - Unit conversion: [`to_base_units`], [`from_base_units`], [`parse_base_units`]
//! - Contract wrappers: [`Erc20Contract`], [`TokenRouterContract`]

mod bridge;
mod config;
mod contracts;
mod error;
mod protocol;
mod providers;
mod receipt;

pub use bridge::{
    BridgeService, PrecheckReport, SupportedDestination, TransferOutcome, TransferRequest,
};
pub use config::{
    credential_from_env, AssetDeployment, BridgeConfig, ChainDescriptor, ChainEntry,
    CoreAddresses, DEFAULT_CREDENTIAL_VAR,
};
pub use contracts::{erc20::Erc20Contract, token_router::TokenRouterContract};
pub use error::{BridgeError, Result};
pub use protocol::{
    address_to_bytes32, from_base_units, is_valid_address, parse_base_units, parse_receiver,
    to_base_units, AmountUnit, SenderCredential, NATIVE_DECIMALS,
};
pub use providers::AlloyGateway;
pub use receipt::TransferReceipt;

// Public module for advanced users who need custom instrumentation
pub mod spans;

/// Fakes for driving [`BridgeService`] without a chain
pub mod testing;

/// Gateway traits [`BridgeService`] is generic over
pub mod traits;
