//! Confirmed remote-transfer receipts and message id extraction.
//!
//! The mailbox emits `DispatchId(bytes32 indexed messageId)` when a router
//! dispatches a message, so the id is the second topic of the single log the
//! mailbox contributes to the transaction.

use alloy_primitives::{Address, Log, TxHash, B256};
use alloy_rpc_types::TransactionReceipt;
use tracing::debug;

use crate::error::{BridgeError, Result};

/// Number of topics on the mailbox log that carries the message id.
const DISPATCH_ID_TOPIC_COUNT: usize = 2;

/// What a confirmed `transferRemote` transaction leaves behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub logs: Vec<Log>,
}

impl TransferReceipt {
    pub fn new(tx_hash: TxHash, logs: Vec<Log>) -> Self {
        Self {
            tx_hash,
            block_number: None,
            logs,
        }
    }

    /// Finds the messaging-layer correlation id in the receipt's logs.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::MessageIdExtraction`] if no log was emitted by `mailbox`
    /// with exactly two topics.
    pub fn message_id(&self, mailbox: Address) -> Result<B256> {
        let log = self
            .logs
            .iter()
            .find(|log| log.address == mailbox && log.topics().len() == DISPATCH_ID_TOPIC_COUNT)
            .ok_or_else(|| {
                BridgeError::MessageIdExtraction(format!(
                    "no log from mailbox {mailbox} with {DISPATCH_ID_TOPIC_COUNT} topics among {} logs",
                    self.logs.len()
                ))
            })?;

        let message_id = log.topics()[1];
        debug!(
            tx_hash = %self.tx_hash,
            message_id = %message_id,
            event = "message_id_extracted"
        );
        Ok(message_id)
    }
}

impl From<&TransactionReceipt> for TransferReceipt {
    fn from(receipt: &TransactionReceipt) -> Self {
        Self {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            logs: receipt
                .inner
                .logs()
                .iter()
                .map(|log| log.inner.clone())
                .collect(),
        }
    }
}
