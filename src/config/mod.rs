//! Static chain and asset configuration
//!
//! The configuration is loaded once and treated as immutable for the lifetime of
//! the process. Lookups fail loudly with [`BridgeError::ConfigNotFound`] rather
//! than falling back to defaults.
//!
//! # Example
//!
//! ```rust
//! use warp_bridge::BridgeConfig;
//!
//! let config = BridgeConfig::from_json_str(r#"{
//!     "chains": {
//!         "sepolia": { "chain_id": 11155111, "rpc_urls": ["https://rpc.sepolia.org"] }
//!     },
//!     "assets": {}
//! }"#).unwrap();
//!
//! let sepolia = config.resolve_chain("sepolia").unwrap();
//! assert_eq!(sepolia.domain_id(), 11155111);
//! ```

mod env;

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use alloy_chains::Chain;
use alloy_primitives::Address;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::error::{BridgeError, Result};

pub use env::{credential_from_env, DEFAULT_CREDENTIAL_VAR};

/// Raw chain entry as it appears in the configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainEntry {
    pub chain_id: u64,
    /// Overrides the messaging domain id; the chain id is used when absent.
    #[serde(default)]
    pub domain_id: Option<u32>,
    #[serde(default)]
    pub rpc_urls: Vec<Option<String>>,
    #[serde(default)]
    pub core_addresses: CoreAddresses,
}

impl ChainEntry {
    fn domain(&self) -> Option<u32> {
        self.domain_id.or_else(|| u32::try_from(self.chain_id).ok())
    }
}

/// Messaging-layer contracts deployed on a chain.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoreAddresses {
    #[serde(default)]
    pub mailbox: Option<Address>,
}

/// Deployment of a single asset on a single chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AssetDeployment {
    pub router_address: Address,
    pub collateral_address: Address,
}

impl AssetDeployment {
    /// Placeholder used when an asset has no deployment on a chain.
    pub const UNCONFIGURED: Self = Self {
        router_address: Address::ZERO,
        collateral_address: Address::ZERO,
    };
}

/// A resolved chain: everything needed to talk to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainDescriptor {
    name: String,
    chain_id: u64,
    domain_id: u32,
    rpc_url: Url,
    mailbox: Option<Address>,
}

impl ChainDescriptor {
    pub fn new(
        name: impl Into<String>,
        chain_id: u64,
        domain_id: u32,
        rpc_url: Url,
        mailbox: Option<Address>,
    ) -> Self {
        Self {
            name: name.into(),
            chain_id,
            domain_id,
            rpc_url,
            mailbox,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Canonical cross-chain addressing key for this chain
    pub fn domain_id(&self) -> u32 {
        self.domain_id
    }

    pub fn rpc_url(&self) -> &Url {
        &self.rpc_url
    }

    pub fn mailbox(&self) -> Option<Address> {
        self.mailbox
    }

    /// The chain as known to `alloy-chains`, used for display in logs.
    pub fn chain(&self) -> Chain {
        Chain::from_id(self.chain_id)
    }
}

/// Static chain table and asset table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    chains: BTreeMap<String, ChainEntry>,
    #[serde(default)]
    assets: BTreeMap<String, BTreeMap<String, AssetDeployment>>,
}

impl BridgeConfig {
    /// Parses and validates configuration from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;

        info!(
            chains = config.chains.len(),
            assets = config.assets.len(),
            event = "bridge_config_loaded"
        );

        Ok(config)
    }

    /// Reads and validates configuration from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), event = "reading_bridge_config");
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Every chain must map to a distinct domain id.
    fn validate(&self) -> Result<()> {
        let mut seen: HashMap<u32, &str> = HashMap::new();
        for (name, entry) in &self.chains {
            let domain = entry.domain().ok_or_else(|| {
                BridgeError::InvalidConfig(format!(
                    "chain '{name}' needs an explicit domain_id, chain id {} does not fit in 32 bits",
                    entry.chain_id
                ))
            })?;
            if let Some(previous) = seen.insert(domain, name) {
                return Err(BridgeError::InvalidConfig(format!(
                    "domain id {domain} is used by both '{previous}' and '{name}'"
                )));
            }
        }
        Ok(())
    }

    /// Names of every configured chain, in sorted order.
    pub fn chain_names(&self) -> impl Iterator<Item = &str> {
        self.chains.keys().map(String::as_str)
    }

    /// Resolves a chain name into its descriptor.
    ///
    /// Only the first configured RPC endpoint is used; there is no failover.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::ConfigNotFound`] if the chain is absent, has no RPC endpoints,
    ///   or its first endpoint is null or empty
    /// - [`BridgeError::InvalidConfig`] if the first endpoint is not a valid URL
    pub fn resolve_chain(&self, name: &str) -> Result<ChainDescriptor> {
        let entry = self
            .chains
            .get(name)
            .ok_or_else(|| BridgeError::ConfigNotFound(format!("chain '{name}' is not configured")))?;

        let first = entry
            .rpc_urls
            .first()
            .ok_or_else(|| {
                BridgeError::ConfigNotFound(format!("chain '{name}' has no RPC endpoints"))
            })?
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                BridgeError::ConfigNotFound(format!(
                    "chain '{name}' has an empty first RPC endpoint"
                ))
            })?;

        let rpc_url = Url::parse(first).map_err(|e| {
            BridgeError::InvalidConfig(format!("chain '{name}' RPC endpoint '{first}': {e}"))
        })?;

        Ok(ChainDescriptor {
            name: name.to_string(),
            chain_id: entry.chain_id,
            domain_id: entry.domain().ok_or_else(|| {
                BridgeError::InvalidConfig(format!("chain '{name}' has no usable domain id"))
            })?,
            rpc_url,
            mailbox: entry.core_addresses.mailbox,
        })
    }

    /// Resolves the router and collateral token deployed for `symbol` on `chain`.
    ///
    /// An asset being absent from a chain is normal; callers decide whether it is fatal.
    pub fn resolve_asset(&self, symbol: &str, chain: &str) -> Result<AssetDeployment> {
        let per_chain = self.assets.get(symbol).ok_or_else(|| {
            BridgeError::ConfigNotFound(format!("token '{symbol}' is not configured"))
        })?;

        per_chain.get(chain).copied().ok_or_else(|| {
            BridgeError::ConfigNotFound(format!(
                "token '{symbol}' is not deployed on chain '{chain}'"
            ))
        })
    }

    /// Resolves the mailbox address of a chain.
    pub fn resolve_mailbox(&self, chain: &str) -> Result<Address> {
        self.chains
            .get(chain)
            .and_then(|entry| entry.core_addresses.mailbox)
            .ok_or_else(|| {
                BridgeError::ConfigNotFound(format!("mailbox address for chain '{chain}'"))
            })
    }

    /// Reverse lookup from a domain id to the configured chain name.
    pub fn chain_for_domain(&self, domain: u32) -> Option<&str> {
        self.chains
            .iter()
            .find(|(_, entry)| entry.domain() == Some(domain))
            .map(|(name, _)| name.as_str())
    }
}
