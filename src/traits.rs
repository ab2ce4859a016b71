//! Gateway traits between the transfer pipelines and the chain.
//!
//! [`BridgeService`](crate::BridgeService) never talks to an RPC endpoint
//! directly. Every on-chain read and write goes through one of these traits,
//! so tests can swap in [`FakeGateway`](crate::testing::FakeGateway) and
//! assert exactly which calls were made.
//!
//! Every method takes the resolved [`ChainDescriptor`] of the chain to talk to,
//! together with explicit contract addresses.
//!
//! Read methods are side-effect free. Write methods block until the
//! transaction has one confirmation. Every failure, whether of the call
//! itself or of confirmation, surfaces as
//! [`BridgeError::ContractCall`](crate::BridgeError::ContractCall).

use alloy_primitives::{Address, TxHash, B256, U256};
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;

use crate::config::ChainDescriptor;
use crate::error::Result;
use crate::receipt::TransferReceipt;

/// Operations against an ERC20 token contract.
#[async_trait]
pub trait TokenGateway: Send + Sync {
    /// Reads `decimals()`. Not cached; every call hits the chain.
    async fn decimals(&self, chain: &ChainDescriptor, token: Address) -> Result<u8>;

    /// Reads `allowance(owner, spender)` in base units.
    async fn allowance(
        &self,
        chain: &ChainDescriptor,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256>;

    /// Reads the token's own `balanceOf(holder)` in base units.
    async fn balance(&self, chain: &ChainDescriptor, token: Address, holder: Address)
        -> Result<U256>;

    /// Sends `approve(spender, amount)` signed by `signer` and waits for confirmation.
    async fn approve(
        &self,
        chain: &ChainDescriptor,
        token: Address,
        spender: Address,
        amount: U256,
        signer: &PrivateKeySigner,
    ) -> Result<TxHash>;
}

/// Operations against a TokenRouter contract.
#[async_trait]
pub trait RouterGateway: Send + Sync {
    /// Domain ids with an enrolled remote router.
    async fn domains(&self, chain: &ChainDescriptor, router: Address) -> Result<Vec<u32>>;

    /// The remote router enrolled for `domain`. The zero word means "none" and
    /// is a valid answer, not an error.
    async fn remote_router(
        &self,
        chain: &ChainDescriptor,
        router: Address,
        domain: u32,
    ) -> Result<B256>;

    /// Native-currency fee, in wei, the router charges to relay to `domain`.
    async fn quote_gas_payment(
        &self,
        chain: &ChainDescriptor,
        router: Address,
        domain: u32,
    ) -> Result<U256>;

    /// The router's bookkeeping of `account`'s transferable balance.
    async fn balance_of(
        &self,
        chain: &ChainDescriptor,
        router: Address,
        account: Address,
    ) -> Result<U256>;

    /// Sends `transferRemote` with `fee` attached as value, and waits for confirmation.
    #[allow(clippy::too_many_arguments)]
    async fn transfer_remote(
        &self,
        chain: &ChainDescriptor,
        router: Address,
        domain: u32,
        recipient: B256,
        amount: U256,
        fee: U256,
        signer: &PrivateKeySigner,
    ) -> Result<TransferReceipt>;
}

/// Native-currency queries.
#[async_trait]
pub trait NativeGateway: Send + Sync {
    /// Balance of `holder` in the chain's native currency, in wei.
    async fn native_balance(&self, chain: &ChainDescriptor, holder: Address) -> Result<U256>;
}

/// Everything the transfer pipelines need from a chain.
pub trait ChainGateway: TokenGateway + RouterGateway + NativeGateway {}

impl<T> ChainGateway for T where T: TokenGateway + RouterGateway + NativeGateway {}
