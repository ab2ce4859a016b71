//! OpenTelemetry span helpers for bridge operations
//!
//! Static span names, structured attributes, and no business logic. The
//! pipelines in [`BridgeService`](crate::BridgeService) and the production
//! gateway use these internally; they are public so applications can wrap
//! their own calls in the same spans.
//!
//! # Example
//!
//! ```rust,no_run
//! use warp_bridge::spans;
//!
//! let span = spans::precheck("USDC", "sepolia", "basesepolia", "1.5");
//! let _guard = span.enter();
//! // Your custom validation here
//! ```

use alloy_primitives::{Address, TxHash, B256, U256};
use tracing::Span;

/// Create span for the read-only transfer precheck.
///
/// Parent: Caller's span
/// Children: Gateway reads
#[inline]
pub fn precheck(token: &str, origin: &str, destination: &str, amount: &str) -> Span {
    tracing::info_span!(
        "warp_bridge.precheck",
        token = token,
        origin = origin,
        destination = destination,
        amount = amount,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for a full transfer execution.
///
/// Parent: Caller's span
/// Children: warp_bridge.approve, warp_bridge.transfer_remote, warp_bridge.extract_message_id
#[inline]
pub fn transfer(token: &str, origin: &str, destination: &str, amount: &str) -> Span {
    tracing::info_span!(
        "warp_bridge.transfer",
        token = token,
        origin = origin,
        destination = destination,
        amount = amount,
        tx_hash = tracing::field::Empty,
        message_id = tracing::field::Empty,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for an ERC20 approval issued ahead of a transfer.
///
/// Parent: warp_bridge.transfer
/// Children: warp_bridge.send_transaction
#[inline]
pub fn approve(token: &Address, spender: &Address, amount: &U256, current_allowance: &U256) -> Span {
    tracing::info_span!(
        "warp_bridge.approve",
        token = %token,
        spender = %spender,
        amount = %amount,
        current_allowance = %current_allowance,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for `transferRemote` transaction creation.
///
/// Parent: warp_bridge.transfer
/// Children: Contract call preparation spans
#[inline]
pub fn transfer_remote(
    from_address: &Address,
    recipient: &B256,
    destination_domain: u32,
    router: &Address,
    amount: &U256,
    fee: &U256,
) -> Span {
    tracing::info_span!(
        "warp_bridge.transfer_remote",
        from_address = %from_address,
        recipient = %recipient,
        destination_domain = destination_domain,
        router = %router,
        amount = %amount,
        fee = %fee,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for transaction submission to blockchain.
///
/// Parent: Operation span (e.g., approve, transfer_remote)
/// Children: Provider RPC calls
#[inline]
pub fn send_transaction(chain: &str, from: &Address) -> Span {
    tracing::debug_span!(
        "warp_bridge.send_transaction",
        chain = chain,
        from = %from,
        tx_hash = tracing::field::Empty,
    )
}

/// Create span for waiting for transaction confirmation.
///
/// Parent: send_transaction
/// Children: Provider RPC calls (polling)
#[inline]
pub fn wait_for_confirmation(tx_hash: TxHash, chain: &str, required_confirmations: u64) -> Span {
    tracing::debug_span!(
        "warp_bridge.wait_for_confirmation",
        tx_hash = %tx_hash,
        chain = chain,
        required_confirmations = required_confirmations,
    )
}

/// Create span for locating the mailbox message id in a receipt.
///
/// Parent: warp_bridge.transfer
/// Children: None
#[inline]
pub fn extract_message_id(tx_hash: TxHash, chain: &str) -> Span {
    tracing::debug_span!(
        "warp_bridge.extract_message_id",
        tx_hash = %tx_hash,
        chain = chain,
    )
}

/// Create span for a read-only RPC call to a chain.
///
/// Parent: Operation span (precheck, transfer)
/// Children: None (provider handles internal spans)
#[inline]
pub fn rpc_call(method: &str, chain: &str, contract: Option<&Address>) -> Span {
    tracing::trace_span!(
        "warp_bridge.rpc_call",
        rpc.method = method,
        rpc.chain = chain,
        rpc.contract = contract.map(tracing::field::display),
    )
}

/// Record error attributes on the current span.
///
/// Follows OpenTelemetry semantic conventions for error tracking:
/// - error.type: The error type/variant
/// - error.message: Human-readable error message
/// - error.source: The underlying cause, when there is one
///
/// # Example
///
/// ```rust,no_run
/// use warp_bridge::spans;
/// use warp_bridge::BridgeError;
///
/// # fn example() -> Result<(), BridgeError> {
/// let span = tracing::info_span!("warp_bridge.operation");
/// let _guard = span.enter();
///
/// let result = some_operation();
/// if let Err(ref e) = result {
///     spans::record_error(e);
/// }
/// result
/// # }
/// # fn some_operation() -> Result<(), BridgeError> { Ok(()) }
/// ```
pub fn record_error<E: std::error::Error>(error: &E) {
    let current_span = tracing::Span::current();
    current_span.record(
        "error.type",
        error.to_string().split(':').next().unwrap_or("Unknown"),
    );
    current_span.record("error.message", error.to_string());
    current_span.record("otel.status_code", "ERROR");

    if let Some(source) = error.source() {
        current_span.record("error.source", source.to_string());
    }
}

/// Record error attributes with custom context on the current span.
pub fn record_error_with_context(
    error_type: &str,
    error_message: &str,
    additional_context: Option<&str>,
) {
    let current_span = tracing::Span::current();
    current_span.record("error.type", error_type);
    current_span.record("error.message", error_message);
    current_span.record("otel.status_code", "ERROR");

    if let Some(context) = additional_context {
        current_span.record("error.context", context);
    }
}
