use alloy_primitives::{Address, B256};
use bon::Builder;
use tracing::{debug, error, info, warn, Instrument};

use crate::config::{AssetDeployment, BridgeConfig, ChainDescriptor};
use crate::error::{BridgeError, Result};
use crate::protocol::{
    address_to_bytes32, amount_in_base_units, from_base_units, parse_receiver, SenderCredential,
    NATIVE_DECIMALS,
};
use crate::receipt::TransferReceipt;
use crate::spans;
use crate::traits::ChainGateway;

use super::request::{PrecheckReport, SupportedDestination, TransferOutcome, TransferRequest};

/// Cross-chain transfer orchestrator
///
/// Holds the static configuration and a [`ChainGateway`] through which every
/// on-chain read and write is made. The service keeps no state between calls:
/// two concurrent transfers never contend on anything in-process.
///
/// # Example
///
/// ```rust,no_run
/// use warp_bridge::{AlloyGateway, BridgeConfig, BridgeService, TransferRequest};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service = BridgeService::builder()
///     .config(BridgeConfig::from_path("bridge.json")?)
///     .gateway(AlloyGateway::new())
///     .build();
///
/// let request = TransferRequest::builder()
///     .token("USDC")
///     .origin("sepolia")
///     .destination("basesepolia")
///     .receiver("0x70997970C51812dc3A010C7d01b50e0d17dc79C8")
///     .sender(warp_bridge::credential_from_env(warp_bridge::DEFAULT_CREDENTIAL_VAR)?)
///     .amount("1.5")
///     .build();
///
/// service.precheck(&request).await?;
/// let outcome = service.transfer(&request).await?;
/// println!("sent {} (message {:?})", outcome.tx_hash, outcome.message_id);
/// # Ok(())
/// # }
/// ```
#[derive(Builder, Debug, Clone)]
pub struct BridgeService<G: ChainGateway> {
    config: BridgeConfig,
    gateway: G,
}

impl<G: ChainGateway> BridgeService<G> {
    /// Returns the configuration the service resolves against
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Returns the gateway used for on-chain calls
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Predicts whether [`transfer`](Self::transfer) would succeed, without writing anything.
    ///
    /// Runs the following checks strictly in order, stopping at the first failure:
    ///
    /// 1. every request field is non-empty
    /// 2. the amount is a finite, strictly positive number
    /// 3. origin and destination are different chain names
    /// 4. the receiver is a `0x`-prefixed address
    /// 5. the sender is an address or a private key an address can be derived from
    /// 6. the origin router has a router enrolled for the destination domain
    /// 7. the sender's router balance covers the amount
    /// 8. the sender's native balance covers the quoted interchain fee
    ///
    /// If the token is not configured on the origin chain, step 6 onwards run
    /// against the zero address instead of failing on the missing entry.
    ///
    /// # Errors
    ///
    /// Any failure, including RPC errors, is returned as
    /// [`BridgeError::PrecheckFailed`] wrapping the cause.
    pub async fn precheck(&self, request: &TransferRequest) -> Result<PrecheckReport> {
        let span = spans::precheck(
            request.token(),
            request.origin(),
            request.destination(),
            request.amount(),
        );

        async {
            match self.run_precheck(request).await {
                Ok(report) => {
                    info!(
                        sender = %report.sender,
                        amount = %report.amount,
                        destination_domain = report.destination_domain,
                        fee = %report.fee,
                        event = "precheck_passed"
                    );
                    Ok(report)
                }
                Err(e) => {
                    spans::record_error(&e);
                    warn!(error = %e, event = "precheck_failed");
                    Err(BridgeError::PrecheckFailed(Box::new(e)))
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run_precheck(&self, request: &TransferRequest) -> Result<PrecheckReport> {
        validate_required_fields(request)?;
        validate_amount(request.amount())?;

        if request.origin() == request.destination() {
            return Err(BridgeError::SameChain);
        }

        parse_receiver(request.receiver())?;
        let sender = SenderCredential::parse(request.sender())?.address();
        debug!(sender = %sender, event = "precheck_inputs_valid");

        let origin = self.config.resolve_chain(request.origin())?;
        let destination = self.config.resolve_chain(request.destination())?;
        let domain = destination.domain_id();

        let deployment = match self.config.resolve_asset(request.token(), origin.name()) {
            Ok(deployment) => deployment,
            Err(e) => {
                warn!(
                    token = %request.token(),
                    chain = %origin.name(),
                    error = %e,
                    event = "origin_asset_unconfigured"
                );
                AssetDeployment::UNCONFIGURED
            }
        };
        let router = deployment.router_address;

        let remote = self.gateway.remote_router(&origin, router, domain).await?;
        if remote == B256::ZERO {
            return Err(BridgeError::NoRouterForDestination {
                token: request.token().to_string(),
                destination: destination.name().to_string(),
                domain,
            });
        }
        debug!(domain = domain, remote_router = %remote, event = "destination_router_found");

        let amount = amount_in_base_units(request.amount(), request.unit(), || {
            self.gateway.decimals(&origin, deployment.collateral_address)
        })
        .await?;

        let balance = self.gateway.balance_of(&origin, router, sender).await?;
        if balance < amount {
            return Err(BridgeError::InsufficientTokenBalance {
                balance,
                required: amount,
            });
        }

        let fee = self.gateway.quote_gas_payment(&origin, router, domain).await?;
        let native = self.gateway.native_balance(&origin, sender).await?;
        if native < fee {
            return Err(BridgeError::InsufficientNativeBalance {
                balance: from_base_units(native, NATIVE_DECIMALS)?,
                required: from_base_units(fee, NATIVE_DECIMALS)?,
            });
        }

        Ok(PrecheckReport {
            sender,
            amount,
            destination_domain: domain,
            fee,
        })
    }

    /// Sends the transfer: approves the router if needed, pays the quoted
    /// fee, and waits for the remote transfer to confirm.
    ///
    /// Only the request fields, the amount and the receiver are validated here;
    /// run [`precheck`](Self::precheck) first to catch balance and routing
    /// problems before paying for an approval.
    ///
    /// When the current allowance does not cover the amount, an approval for
    /// exactly the amount is confirmed before the transfer is sent.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::InvalidSender`] if the sender is not a private key
    /// - [`BridgeError::ConfigNotFound`] if either chain or the origin asset is not configured
    /// - [`BridgeError::ContractCall`] if any read or write fails
    ///
    /// Failing to find the message id is not an error; the outcome then
    /// carries `message_id: None`.
    pub async fn transfer(&self, request: &TransferRequest) -> Result<TransferOutcome> {
        let span = spans::transfer(
            request.token(),
            request.origin(),
            request.destination(),
            request.amount(),
        );

        async {
            let result = self.run_transfer(request).await;
            if let Err(ref e) = result {
                spans::record_error(e);
                error!(error = %e, event = "transfer_failed");
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run_transfer(&self, request: &TransferRequest) -> Result<TransferOutcome> {
        validate_required_fields(request)?;
        validate_amount(request.amount())?;
        let receiver = parse_receiver(request.receiver())?;
        let credential = SenderCredential::parse(request.sender())?;
        let signer = credential.require_signer()?;
        let sender = credential.address();

        let origin = self.config.resolve_chain(request.origin())?;
        let destination = self.config.resolve_chain(request.destination())?;
        let deployment = self.config.resolve_asset(request.token(), origin.name())?;
        let domain = destination.domain_id();
        let router = deployment.router_address;
        let token = deployment.collateral_address;

        let amount = amount_in_base_units(request.amount(), request.unit(), || {
            self.gateway.decimals(&origin, token)
        })
        .await?;

        let allowance = self.gateway.allowance(&origin, token, sender, router).await?;
        if allowance < amount {
            let approval = async {
                info!(
                    current_allowance = %allowance,
                    amount = %amount,
                    event = "approval_required"
                );
                let tx_hash = self
                    .gateway
                    .approve(&origin, token, router, amount, signer)
                    .await
                    .inspect_err(|e| spans::record_error(e))?;
                info!(tx_hash = %tx_hash, event = "approval_confirmed");
                Ok::<_, BridgeError>(tx_hash)
            };
            approval
                .instrument(spans::approve(&token, &router, &amount, &allowance))
                .await?;
        } else {
            debug!(
                current_allowance = %allowance,
                amount = %amount,
                event = "approval_skipped"
            );
        }

        let fee = self.gateway.quote_gas_payment(&origin, router, domain).await?;
        let recipient = address_to_bytes32(receiver);

        let receipt = self
            .gateway
            .transfer_remote(&origin, router, domain, recipient, amount, fee, signer)
            .await?;

        let current = tracing::Span::current();
        current.record("tx_hash", tracing::field::display(receipt.tx_hash));
        info!(
            tx_hash = %receipt.tx_hash,
            destination_domain = domain,
            amount = %amount,
            fee = %fee,
            event = "transfer_remote_confirmed"
        );

        let message_id = match self.message_id(&origin, &receipt) {
            Ok(id) => {
                current.record("message_id", tracing::field::display(id));
                Some(id)
            }
            Err(e) => {
                warn!(tx_hash = %receipt.tx_hash, error = %e, event = "message_id_unavailable");
                None
            }
        };

        Ok(TransferOutcome {
            tx_hash: receipt.tx_hash,
            message_id,
        })
    }

    fn message_id(&self, origin: &ChainDescriptor, receipt: &TransferReceipt) -> Result<B256> {
        let span = spans::extract_message_id(receipt.tx_hash, origin.name());
        let _guard = span.enter();

        let mailbox = origin.mailbox().ok_or_else(|| {
            BridgeError::ConfigNotFound(format!("mailbox address for chain '{}'", origin.name()))
        })?;
        receipt.message_id(mailbox)
    }

    /// Lists the domains the origin router has a counterpart enrolled for,
    /// naming the configured chain behind each where there is one.
    pub async fn supported_destinations(
        &self,
        token: &str,
        origin: &str,
    ) -> Result<Vec<SupportedDestination>> {
        let chain = self.config.resolve_chain(origin)?;
        let deployment = self.config.resolve_asset(token, origin)?;

        let domains = self
            .gateway
            .domains(&chain, deployment.router_address)
            .await?;

        debug!(
            token = token,
            origin = origin,
            count = domains.len(),
            event = "supported_destinations_listed"
        );

        Ok(domains
            .into_iter()
            .map(|domain_id| SupportedDestination {
                domain_id,
                chain: self.config.chain_for_domain(domain_id).map(str::to_string),
            })
            .collect())
    }

    /// Reads `holder`'s balance of the collateral token on `chain`, formatted
    /// with the token's decimals.
    pub async fn token_balance(&self, token: &str, chain: &str, holder: Address) -> Result<String> {
        let descriptor = self.config.resolve_chain(chain)?;
        let deployment = self.config.resolve_asset(token, chain)?;
        let collateral = deployment.collateral_address;

        let decimals = self.gateway.decimals(&descriptor, collateral).await?;
        let balance = self.gateway.balance(&descriptor, collateral, holder).await?;

        from_base_units(balance, decimals)
    }
}

fn validate_required_fields(request: &TransferRequest) -> Result<()> {
    let fields = [
        ("token", request.token()),
        ("origin", request.origin()),
        ("destination", request.destination()),
        ("receiver", request.receiver()),
        ("sender", request.sender()),
        ("amount", request.amount()),
    ];

    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some(&(name, _)) => Err(BridgeError::MissingParameter { name }),
        None => Ok(()),
    }
}

fn validate_amount(amount: &str) -> Result<()> {
    match amount.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(()),
        _ => Err(BridgeError::InvalidAmount(amount.to_string())),
    }
}
