//! Alloy-based gateway implementation.

use alloy_network::{Ethereum, EthereumWallet};
use alloy_primitives::{Address, TxHash, B256, U256};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::{TransactionReceipt, TransactionRequest};
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use tracing::{debug, error, info, instrument, Instrument};

use crate::config::ChainDescriptor;
use crate::contracts::erc20::Erc20Contract;
use crate::contracts::token_router::TokenRouterContract;
use crate::error::{BridgeError, Result};
use crate::receipt::TransferReceipt;
use crate::spans;
use crate::traits::{NativeGateway, RouterGateway, TokenGateway};

/// Confirmations awaited after every write.
const REQUIRED_CONFIRMATIONS: u64 = 1;

/// Production gateway talking JSON-RPC over HTTP.
///
/// Holds no connection state: a fresh provider is built against the chain's
/// RPC endpoint for every operation, with a wallet attached only for writes.
///
/// # Examples
///
/// ```rust,no_run
/// use warp_bridge::{AlloyGateway, BridgeConfig, BridgeService};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = BridgeConfig::from_path("bridge.json")?;
/// let service = BridgeService::builder()
///     .config(config)
///     .gateway(AlloyGateway::new())
///     .build();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AlloyGateway;

impl AlloyGateway {
    /// Creates a new gateway.
    pub fn new() -> Self {
        Self
    }

    fn reader(chain: &ChainDescriptor) -> impl Provider<Ethereum> + Clone {
        ProviderBuilder::new().connect_http(chain.rpc_url().clone())
    }

    fn writer(chain: &ChainDescriptor, signer: &PrivateKeySigner) -> impl Provider<Ethereum> + Clone {
        ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer.clone()))
            .connect_http(chain.rpc_url().clone())
    }

    /// Signs, submits and waits for `tx` to be included.
    ///
    /// A reverted transaction is a failure even though it was mined.
    async fn send_and_confirm<P: Provider<Ethereum>>(
        provider: &P,
        chain: &ChainDescriptor,
        from: Address,
        tx: TransactionRequest,
        context: &'static str,
    ) -> Result<TransactionReceipt> {
        let span = spans::send_transaction(chain.name(), &from);

        async {
            let pending = provider.send_transaction(tx).await.map_err(|e| {
                spans::record_error_with_context(context, &e.to_string(), None);
                error!(error = %e, chain = %chain.name(), event = "transaction_submission_failed");
                BridgeError::contract_call(context, e)
            })?;

            let tx_hash = *pending.tx_hash();
            tracing::Span::current().record("tx_hash", tracing::field::display(tx_hash));
            info!(
                tx_hash = %tx_hash,
                chain = %chain.name(),
                network = %chain.chain(),
                event = "transaction_sent"
            );

            let receipt = pending
                .with_required_confirmations(REQUIRED_CONFIRMATIONS)
                .get_receipt()
                .instrument(spans::wait_for_confirmation(
                    tx_hash,
                    chain.name(),
                    REQUIRED_CONFIRMATIONS,
                ))
                .await
                .map_err(|e| {
                    error!(tx_hash = %tx_hash, error = %e, event = "transaction_confirmation_failed");
                    BridgeError::contract_call(context, e)
                })?;

            if !receipt.inner.status() {
                error!(tx_hash = %tx_hash, event = "transaction_reverted");
                return Err(BridgeError::contract_call(
                    context,
                    format!("transaction {tx_hash} reverted"),
                ));
            }

            info!(
                tx_hash = %tx_hash,
                block_number = ?receipt.block_number,
                gas_used = receipt.gas_used,
                event = "transaction_confirmed"
            );

            Ok::<_, BridgeError>(receipt)
        }
        .instrument(span)
        .await
    }
}

#[async_trait]
impl TokenGateway for AlloyGateway {
    #[instrument(skip(self, chain), fields(chain = %chain.name()))]
    async fn decimals(&self, chain: &ChainDescriptor, token: Address) -> Result<u8> {
        Erc20Contract::new(token, Self::reader(chain))
            .decimals()
            .instrument(spans::rpc_call("decimals", chain.name(), Some(&token)))
            .await
            .map_err(|e| BridgeError::contract_call("Failed to read token decimals", e))
    }

    #[instrument(skip(self, chain), fields(chain = %chain.name()))]
    async fn allowance(
        &self,
        chain: &ChainDescriptor,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256> {
        Erc20Contract::new(token, Self::reader(chain))
            .allowance(owner, spender)
            .instrument(spans::rpc_call("allowance", chain.name(), Some(&token)))
            .await
            .map_err(|e| BridgeError::contract_call("Failed to read token allowance", e))
    }

    #[instrument(skip(self, chain), fields(chain = %chain.name()))]
    async fn balance(&self, chain: &ChainDescriptor, token: Address, holder: Address) -> Result<U256> {
        Erc20Contract::new(token, Self::reader(chain))
            .balance_of(holder)
            .instrument(spans::rpc_call("balanceOf", chain.name(), Some(&token)))
            .await
            .map_err(|e| BridgeError::contract_call("Failed to read token balance", e))
    }

    async fn approve(
        &self,
        chain: &ChainDescriptor,
        token: Address,
        spender: Address,
        amount: U256,
        signer: &PrivateKeySigner,
    ) -> Result<TxHash> {
        const CONTEXT: &str = "Failed to approve token";

        let from = signer.address();
        let provider = Self::writer(chain, signer);
        let tx = Erc20Contract::new(token, &provider).approve_transaction(from, spender, amount);

        let receipt = Self::send_and_confirm(&provider, chain, from, tx, CONTEXT).await?;
        Ok(receipt.transaction_hash)
    }
}

#[async_trait]
impl RouterGateway for AlloyGateway {
    #[instrument(skip(self, chain), fields(chain = %chain.name()))]
    async fn domains(&self, chain: &ChainDescriptor, router: Address) -> Result<Vec<u32>> {
        TokenRouterContract::new(router, Self::reader(chain))
            .domains()
            .instrument(spans::rpc_call("domains", chain.name(), Some(&router)))
            .await
            .map_err(|e| BridgeError::contract_call("Failed to list router domains", e))
    }

    #[instrument(skip(self, chain), fields(chain = %chain.name()))]
    async fn remote_router(
        &self,
        chain: &ChainDescriptor,
        router: Address,
        domain: u32,
    ) -> Result<B256> {
        TokenRouterContract::new(router, Self::reader(chain))
            .routers(domain)
            .instrument(spans::rpc_call("routers", chain.name(), Some(&router)))
            .await
            .map_err(|e| BridgeError::contract_call("Failed to read remote router", e))
    }

    #[instrument(skip(self, chain), fields(chain = %chain.name()))]
    async fn quote_gas_payment(
        &self,
        chain: &ChainDescriptor,
        router: Address,
        domain: u32,
    ) -> Result<U256> {
        TokenRouterContract::new(router, Self::reader(chain))
            .quote_gas_payment(domain)
            .instrument(spans::rpc_call("quoteGasPayment", chain.name(), Some(&router)))
            .await
            .map_err(|e| BridgeError::contract_call("Failed to quote interchain gas payment", e))
    }

    #[instrument(skip(self, chain), fields(chain = %chain.name()))]
    async fn balance_of(
        &self,
        chain: &ChainDescriptor,
        router: Address,
        account: Address,
    ) -> Result<U256> {
        TokenRouterContract::new(router, Self::reader(chain))
            .balance_of(account)
            .instrument(spans::rpc_call("balanceOf", chain.name(), Some(&router)))
            .await
            .map_err(|e| BridgeError::contract_call("Failed to read router balance", e))
    }

    async fn transfer_remote(
        &self,
        chain: &ChainDescriptor,
        router: Address,
        domain: u32,
        recipient: B256,
        amount: U256,
        fee: U256,
        signer: &PrivateKeySigner,
    ) -> Result<TransferReceipt> {
        const CONTEXT: &str = "Failed to submit remote transfer";

        let from = signer.address();
        let provider = Self::writer(chain, signer);
        let tx = TokenRouterContract::new(router, &provider)
            .transfer_remote_transaction(from, domain, recipient, amount, fee);

        let receipt = Self::send_and_confirm(&provider, chain, from, tx, CONTEXT).await?;
        debug!(
            tx_hash = %receipt.transaction_hash,
            logs = receipt.inner.logs().len(),
            event = "transfer_remote_receipt_received"
        );

        Ok(TransferReceipt::from(&receipt))
    }
}

#[async_trait]
impl NativeGateway for AlloyGateway {
    #[instrument(skip(self, chain), fields(chain = %chain.name()))]
    async fn native_balance(&self, chain: &ChainDescriptor, holder: Address) -> Result<U256> {
        let balance = Self::reader(chain)
            .get_balance(holder)
            .await
            .map_err(|e| BridgeError::contract_call("Failed to read native balance", e))?;

        debug!(holder = %holder, balance = %balance, event = "native_balance_retrieved");
        Ok(balance)
    }
}
