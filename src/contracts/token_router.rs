//! TokenRouter contract bindings and wrapper
//!
//! A TokenRouter holds (or mints) the bridged token on one chain, keeps a
//! table of counterpart routers keyed by domain id, and charges a native fee
//! to relay each transfer through the mailbox.

use std::marker::PhantomData;

use alloy_contract::CallBuilder;
use alloy_network::Ethereum;
use alloy_primitives::{Address, B256, U256};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::sol;
use tracing::{debug, info};
use TokenRouter::{transferRemoteCall, TokenRouterInstance};

use crate::spans;

/// Cross-chain TokenRouter contract wrapper
pub struct TokenRouterContract<P: Provider<Ethereum>> {
    instance: TokenRouterInstance<P>,
}

impl<P: Provider<Ethereum>> TokenRouterContract<P> {
    /// Create a new TokenRouterContract.
    pub fn new(address: Address, provider: P) -> Self {
        debug!(
            contract_address = %address,
            event = "token_router_contract_initialized"
        );
        Self {
            instance: TokenRouterInstance::new(address, provider),
        }
    }

    /// Domain ids that have an enrolled remote router.
    pub async fn domains(&self) -> Result<Vec<u32>, alloy_contract::Error> {
        let domains = self.instance.domains().call().await?;

        debug!(
            domains = ?domains,
            contract_address = %self.instance.address(),
            event = "domains_retrieved"
        );

        Ok(domains)
    }

    /// The router enrolled for `domain`, left-padded to 32 bytes.
    ///
    /// An all-zero word means no router is enrolled.
    pub async fn routers(&self, domain: u32) -> Result<B256, alloy_contract::Error> {
        let router = self.instance.routers(domain).call().await?;

        debug!(
            domain = domain,
            remote_router = %router,
            contract_address = %self.instance.address(),
            event = "remote_router_retrieved"
        );

        Ok(router)
    }

    /// Native-currency fee required to relay a transfer to `domain`.
    pub async fn quote_gas_payment(&self, domain: u32) -> Result<U256, alloy_contract::Error> {
        let fee = self.instance.quoteGasPayment(domain).call().await?;

        info!(
            destination_domain = domain,
            fee = %fee,
            contract_address = %self.instance.address(),
            event = "gas_payment_quoted"
        );

        Ok(fee)
    }

    /// The router's view of `account`'s transferable balance, in base units.
    pub async fn balance_of(&self, account: Address) -> Result<U256, alloy_contract::Error> {
        let balance = self.instance.balanceOf(account).call().await?;

        debug!(
            account = %account,
            balance = %balance,
            contract_address = %self.instance.address(),
            event = "router_balance_retrieved"
        );

        Ok(balance)
    }

    /// Create the call builder for the `transferRemote` function.
    ///
    /// Most users will want to use the `transfer_remote_transaction` function instead.
    pub fn transfer_remote_call_builder(
        &self,
        from_address: Address,
        destination_domain: u32,
        recipient: B256,
        amount: U256,
        fee: U256,
    ) -> CallBuilder<&P, PhantomData<transferRemoteCall>> {
        self.instance
            .transferRemote(destination_domain, recipient, amount)
            .from(from_address)
            .value(fee)
    }

    /// Create the transaction request for the `transferRemote` function,
    /// attaching `fee` as the transaction value.
    pub fn transfer_remote_transaction(
        &self,
        from_address: Address,
        destination_domain: u32,
        recipient: B256,
        amount: U256,
        fee: U256,
    ) -> TransactionRequest {
        let span = spans::transfer_remote(
            &from_address,
            &recipient,
            destination_domain,
            self.instance.address(),
            &amount,
            &fee,
        );
        let _guard = span.enter();

        info!(
            from_address = %from_address,
            recipient = %recipient,
            destination_domain = destination_domain,
            amount = %amount,
            fee = %fee,
            contract_address = %self.instance.address(),
            event = "transfer_remote_transaction_created"
        );

        self.transfer_remote_call_builder(from_address, destination_domain, recipient, amount, fee)
            .into_transaction_request()
    }

    /// Returns the contract address
    pub fn address(&self) -> Address {
        *self.instance.address()
    }
}

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract TokenRouter {
        function domains() external view returns (uint32[] memory);
        function routers(uint32 domain) external view returns (bytes32);
        function quoteGasPayment(uint32 destinationDomain) external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function transferRemote(uint32 destination, bytes32 recipient, uint256 amount)
            external
            payable
            returns (bytes32 messageId);
    }
);
