//! Test utilities and a fake chain gateway
//!
//! [`FakeGateway`] answers every gateway call from in-memory tables and records
//! each call it receives, so tests can drive [`BridgeService`](crate::BridgeService)
//! through its pipelines without a chain and assert exactly what was read and written.
//!
//! Unset values read as zero, matching what an uninitialized contract slot returns.
//! Failures can be injected per contract method.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use alloy_primitives::{Address, Log, TxHash, B256, U256};
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;

use crate::config::ChainDescriptor;
use crate::error::{BridgeError, Result};
use crate::receipt::TransferReceipt;
use crate::traits::{NativeGateway, RouterGateway, TokenGateway};

/// Hash returned for every approval sent through the fake.
pub const FAKE_APPROVE_TX_HASH: TxHash = TxHash::repeat_byte(0xaa);

/// Hash returned for every remote transfer sent through the fake.
pub const FAKE_TRANSFER_TX_HASH: TxHash = TxHash::repeat_byte(0xbb);

/// A call received by [`FakeGateway`], named after the contract method it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    Decimals {
        chain: String,
        token: Address,
    },
    Allowance {
        chain: String,
        token: Address,
        owner: Address,
        spender: Address,
    },
    Balance {
        chain: String,
        token: Address,
        holder: Address,
    },
    Approve {
        chain: String,
        token: Address,
        spender: Address,
        amount: U256,
        from: Address,
    },
    Domains {
        chain: String,
        router: Address,
    },
    Routers {
        chain: String,
        router: Address,
        domain: u32,
    },
    QuoteGasPayment {
        chain: String,
        router: Address,
        domain: u32,
    },
    BalanceOf {
        chain: String,
        router: Address,
        account: Address,
    },
    TransferRemote {
        chain: String,
        router: Address,
        domain: u32,
        recipient: B256,
        amount: U256,
        fee: U256,
        from: Address,
    },
    NativeBalance {
        chain: String,
        holder: Address,
    },
}

impl GatewayCall {
    /// Whether the call would change chain state.
    pub fn is_write(&self) -> bool {
        matches!(self, Self::Approve { .. } | Self::TransferRemote { .. })
    }
}

#[derive(Debug, Default)]
struct FakeChainState {
    decimals: HashMap<Address, u8>,
    allowances: HashMap<(Address, Address, Address), U256>,
    token_balances: HashMap<(Address, Address), U256>,
    domains: HashMap<Address, Vec<u32>>,
    remote_routers: HashMap<(Address, u32), B256>,
    fees: HashMap<(Address, u32), U256>,
    router_balances: HashMap<(Address, Address), U256>,
    native_balances: HashMap<Address, U256>,
    receipt_logs: Vec<Log>,
}

/// A fake gateway backed by in-memory tables.
///
/// State is shared between clones, so a test can keep a handle after moving
/// one into a [`BridgeService`](crate::BridgeService).
#[derive(Clone, Debug, Default)]
pub struct FakeGateway {
    state: Arc<Mutex<FakeChainState>>,
    calls: Arc<Mutex<Vec<GatewayCall>>>,
    failures: Arc<Mutex<HashSet<&'static str>>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `decimals()` of a token
    pub fn set_decimals(&self, token: Address, decimals: u8) {
        self.state.lock().unwrap().decimals.insert(token, decimals);
    }

    /// Set the allowance `owner` has granted `spender` on `token`
    pub fn set_allowance(&self, token: Address, owner: Address, spender: Address, amount: U256) {
        self.state
            .lock()
            .unwrap()
            .allowances
            .insert((token, owner, spender), amount);
    }

    /// Set the raw ERC20 balance of `holder`
    pub fn set_token_balance(&self, token: Address, holder: Address, amount: U256) {
        self.state
            .lock()
            .unwrap()
            .token_balances
            .insert((token, holder), amount);
    }

    /// Set the domains a router reports from `domains()`
    pub fn set_domains(&self, router: Address, domains: Vec<u32>) {
        self.state.lock().unwrap().domains.insert(router, domains);
    }

    /// Enroll a remote router for `domain`
    pub fn set_remote_router(&self, router: Address, domain: u32, remote: B256) {
        self.state
            .lock()
            .unwrap()
            .remote_routers
            .insert((router, domain), remote);
    }

    /// Set the fee a router quotes for `domain`
    pub fn set_fee(&self, router: Address, domain: u32, fee: U256) {
        self.state.lock().unwrap().fees.insert((router, domain), fee);
    }

    /// Set the router-reported balance of `account`
    pub fn set_router_balance(&self, router: Address, account: Address, amount: U256) {
        self.state
            .lock()
            .unwrap()
            .router_balances
            .insert((router, account), amount);
    }

    /// Set the native balance of `holder`
    pub fn set_native_balance(&self, holder: Address, amount: U256) {
        self.state
            .lock()
            .unwrap()
            .native_balances
            .insert(holder, amount);
    }

    /// Logs carried by the receipt of every remote transfer
    pub fn set_receipt_logs(&self, logs: Vec<Log>) {
        self.state.lock().unwrap().receipt_logs = logs;
    }

    /// Make every call to the named contract method fail, e.g. `"approve"` or `"quoteGasPayment"`
    pub fn fail_on(&self, method: &'static str) {
        self.failures.lock().unwrap().insert(method);
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded calls matching `predicate`
    pub fn count(&self, predicate: impl Fn(&GatewayCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    /// Number of `decimals()` lookups
    pub fn decimals_calls(&self) -> usize {
        self.count(|c| matches!(c, GatewayCall::Decimals { .. }))
    }

    /// Number of fee quotes
    pub fn quote_calls(&self) -> usize {
        self.count(|c| matches!(c, GatewayCall::QuoteGasPayment { .. }))
    }

    /// Every approval sent, as `(token, spender, amount)`
    pub fn approvals(&self) -> Vec<(Address, Address, U256)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                GatewayCall::Approve {
                    token,
                    spender,
                    amount,
                    ..
                } => Some((*token, *spender, *amount)),
                _ => None,
            })
            .collect()
    }

    /// Every state-changing call
    pub fn writes(&self) -> Vec<GatewayCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.is_write())
            .cloned()
            .collect()
    }

    fn record(&self, call: GatewayCall, method: &'static str, context: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(call);

        if self.failures.lock().unwrap().contains(method) {
            return Err(BridgeError::contract_call(context, "simulated RPC error"));
        }
        Ok(())
    }
}

#[async_trait]
impl TokenGateway for FakeGateway {
    async fn decimals(&self, chain: &ChainDescriptor, token: Address) -> Result<u8> {
        self.record(
            GatewayCall::Decimals {
                chain: chain.name().to_string(),
                token,
            },
            "decimals",
            "Failed to read token decimals",
        )?;

        self.state
            .lock()
            .unwrap()
            .decimals
            .get(&token)
            .copied()
            .ok_or_else(|| {
                BridgeError::contract_call("Failed to read token decimals", "execution reverted")
            })
    }

    async fn allowance(
        &self,
        chain: &ChainDescriptor,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256> {
        self.record(
            GatewayCall::Allowance {
                chain: chain.name().to_string(),
                token,
                owner,
                spender,
            },
            "allowance",
            "Failed to read token allowance",
        )?;

        let state = self.state.lock().unwrap();
        Ok(state
            .allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default())
    }

    async fn balance(&self, chain: &ChainDescriptor, token: Address, holder: Address) -> Result<U256> {
        self.record(
            GatewayCall::Balance {
                chain: chain.name().to_string(),
                token,
                holder,
            },
            "balance",
            "Failed to read token balance",
        )?;

        let state = self.state.lock().unwrap();
        Ok(state
            .token_balances
            .get(&(token, holder))
            .copied()
            .unwrap_or_default())
    }

    async fn approve(
        &self,
        chain: &ChainDescriptor,
        token: Address,
        spender: Address,
        amount: U256,
        signer: &PrivateKeySigner,
    ) -> Result<TxHash> {
        let from = signer.address();
        self.record(
            GatewayCall::Approve {
                chain: chain.name().to_string(),
                token,
                spender,
                amount,
                from,
            },
            "approve",
            "Failed to approve token",
        )?;

        self.set_allowance(token, from, spender, amount);
        Ok(FAKE_APPROVE_TX_HASH)
    }
}

#[async_trait]
impl RouterGateway for FakeGateway {
    async fn domains(&self, chain: &ChainDescriptor, router: Address) -> Result<Vec<u32>> {
        self.record(
            GatewayCall::Domains {
                chain: chain.name().to_string(),
                router,
            },
            "domains",
            "Failed to list router domains",
        )?;

        let state = self.state.lock().unwrap();
        Ok(state.domains.get(&router).cloned().unwrap_or_default())
    }

    async fn remote_router(
        &self,
        chain: &ChainDescriptor,
        router: Address,
        domain: u32,
    ) -> Result<B256> {
        self.record(
            GatewayCall::Routers {
                chain: chain.name().to_string(),
                router,
                domain,
            },
            "routers",
            "Failed to read remote router",
        )?;

        let state = self.state.lock().unwrap();
        Ok(state
            .remote_routers
            .get(&(router, domain))
            .copied()
            .unwrap_or_default())
    }

    async fn quote_gas_payment(
        &self,
        chain: &ChainDescriptor,
        router: Address,
        domain: u32,
    ) -> Result<U256> {
        self.record(
            GatewayCall::QuoteGasPayment {
                chain: chain.name().to_string(),
                router,
                domain,
            },
            "quoteGasPayment",
            "Failed to quote interchain gas payment",
        )?;

        let state = self.state.lock().unwrap();
        Ok(state.fees.get(&(router, domain)).copied().unwrap_or_default())
    }

    async fn balance_of(
        &self,
        chain: &ChainDescriptor,
        router: Address,
        account: Address,
    ) -> Result<U256> {
        self.record(
            GatewayCall::BalanceOf {
                chain: chain.name().to_string(),
                router,
                account,
            },
            "balanceOf",
            "Failed to read router balance",
        )?;

        let state = self.state.lock().unwrap();
        Ok(state
            .router_balances
            .get(&(router, account))
            .copied()
            .unwrap_or_default())
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
        self.record(
            GatewayCall::TransferRemote {
                chain: chain.name().to_string(),
                router,
                domain,
                recipient,
                amount,
                fee,
                from: signer.address(),
            },
            "transferRemote",
            "Failed to submit remote transfer",
        )?;

        let logs = self.state.lock().unwrap().receipt_logs.clone();
        Ok(TransferReceipt::new(FAKE_TRANSFER_TX_HASH, logs))
    }
}

#[async_trait]
impl NativeGateway for FakeGateway {
    async fn native_balance(&self, chain: &ChainDescriptor, holder: Address) -> Result<U256> {
        self.record(
            GatewayCall::NativeBalance {
                chain: chain.name().to_string(),
                holder,
            },
            "getBalance",
            "Failed to read native balance",
        )?;

        let state = self.state.lock().unwrap();
        Ok(state
            .native_balances
            .get(&holder)
            .copied()
            .unwrap_or_default())
    }
}
