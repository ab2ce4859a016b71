use std::fmt;

use alloy_primitives::{Address, TxHash, B256, U256};
use bon::Builder;

use crate::protocol::{is_valid_address, AmountUnit};

/// What a caller asks to move, from where, to whom.
///
/// Every field is taken verbatim; validation happens in
/// [`BridgeService::precheck`](crate::BridgeService::precheck) and
/// [`BridgeService::transfer`](crate::BridgeService::transfer), so an empty
/// string here is reported as a missing parameter rather than rejected at
/// construction.
///
/// `sender` is either an address (enough for a precheck) or a hex private key
/// (required to transfer). `Debug` output never includes a private key.
#[derive(Builder, Clone)]
pub struct TransferRequest {
    /// Asset symbol as it appears in the configuration, e.g. `USDC`.
    #[builder(into)]
    token: String,
    #[builder(into)]
    origin: String,
    #[builder(into)]
    destination: String,
    #[builder(into)]
    receiver: String,
    #[builder(into)]
    sender: String,
    /// Decimal string, interpreted according to `unit`.
    #[builder(into)]
    amount: String,
    #[builder(default)]
    unit: AmountUnit,
}

impl TransferRequest {
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn unit(&self) -> AmountUnit {
        self.unit
    }
}

impl fmt::Debug for TransferRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sender = if is_valid_address(self.sender.trim()) {
            self.sender.as_str()
        } else {
            "<redacted>"
        };

        f.debug_struct("TransferRequest")
            .field("token", &self.token)
            .field("origin", &self.origin)
            .field("destination", &self.destination)
            .field("receiver", &self.receiver)
            .field("sender", &sender)
            .field("amount", &self.amount)
            .field("unit", &self.unit)
            .finish()
    }
}

/// Result of a confirmed remote transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOutcome {
    pub tx_hash: TxHash,
    /// Messaging-layer correlation id. `None` when it could not be located in
    /// the receipt; the transfer itself still succeeded.
    pub message_id: Option<B256>,
}

/// Values resolved by a passing precheck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecheckReport {
    pub sender: Address,
    /// Requested amount in base units.
    pub amount: U256,
    pub destination_domain: u32,
    /// Quoted interchain fee in wei of the origin chain's native currency.
    pub fee: U256,
}

/// A domain the origin router can send to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedDestination {
    pub domain_id: u32,
    /// Configured chain carrying that domain id, if any.
    pub chain: Option<String>,
}
