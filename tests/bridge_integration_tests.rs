//! Integration tests for the transfer pipelines using the fake gateway
//!
//! Every test drives [`BridgeService`] end to end against [`FakeGateway`] and
//! asserts both the outcome and the exact calls made against the chain.

use alloy_primitives::{address, b256, keccak256, utils::parse_ether, Address, Bytes, Log, B256, U256};
use insta::assert_snapshot;
use rstest::rstest;
use warp_bridge::testing::{FakeGateway, GatewayCall, FAKE_TRANSFER_TX_HASH};
use warp_bridge::{
    from_base_units, to_base_units, AmountUnit, BridgeConfig, BridgeError, BridgeService,
    TransferRequest,
};

// Anvil's first two default accounts
const SENDER_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const SENDER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
const RECEIVER: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
const RECEIVER_ADDRESS: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");

const SEPOLIA_MAILBOX: Address = address!("5555555555555555555555555555555555555555");
const SEPOLIA_ROUTER: Address = address!("1111111111111111111111111111111111111111");
const SEPOLIA_USDC: Address = address!("2222222222222222222222222222222222222222");
const BASE_ROUTER: Address = address!("3333333333333333333333333333333333333333");
const ARB_ROUTER: Address = address!("7777777777777777777777777777777777777777");
const ARB_USDC: Address = address!("8888888888888888888888888888888888888888");

const SEPOLIA_DOMAIN: u32 = 11155111;
const BASE_DOMAIN: u32 = 84532;
const ARB_DOMAIN: u32 = 421614;

const MESSAGE_ID: B256 = b256!("9d4a2f3c8b1e7a6d5c4b3a291807f6e5d4c3b2a1908f7e6d5c4b3a2918070605");

const CONFIG: &str = r#"{
    "chains": {
        "sepolia": {
            "chain_id": 11155111,
            "rpc_urls": ["http://localhost:8545"],
            "core_addresses": { "mailbox": "0x5555555555555555555555555555555555555555" }
        },
        "basesepolia": {
            "chain_id": 84532,
            "rpc_urls": ["http://localhost:8546", "http://localhost:8547"],
            "core_addresses": { "mailbox": "0x6666666666666666666666666666666666666666" }
        },
        "arbsepolia": {
            "chain_id": 421614,
            "rpc_urls": ["http://localhost:8548"]
        }
    },
    "assets": {
        "USDC": {
            "sepolia": {
                "router_address": "0x1111111111111111111111111111111111111111",
                "collateral_address": "0x2222222222222222222222222222222222222222"
            },
            "basesepolia": {
                "router_address": "0x3333333333333333333333333333333333333333",
                "collateral_address": "0x4444444444444444444444444444444444444444"
            },
            "arbsepolia": {
                "router_address": "0x7777777777777777777777777777777777777777",
                "collateral_address": "0x8888888888888888888888888888888888888888"
            }
        },
        "WETH": {
            "basesepolia": {
                "router_address": "0x9999999999999999999999999999999999999999",
                "collateral_address": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
            }
        }
    }
}"#;

fn remote_router() -> B256 {
    BASE_ROUTER.into_word()
}

/// A gateway where a 1.5 USDC transfer from sepolia to basesepolia passes every check.
fn funded_gateway() -> FakeGateway {
    let gateway = FakeGateway::new();
    gateway.set_decimals(SEPOLIA_USDC, 6);
    gateway.set_remote_router(SEPOLIA_ROUTER, BASE_DOMAIN, remote_router());
    gateway.set_router_balance(SEPOLIA_ROUTER, SENDER, U256::from(10_000_000u64));
    gateway.set_fee(SEPOLIA_ROUTER, BASE_DOMAIN, parse_ether("0.01").unwrap());
    gateway.set_native_balance(SENDER, parse_ether("1").unwrap());
    gateway
}

fn create_test_service(gateway: FakeGateway) -> BridgeService<FakeGateway> {
    BridgeService::builder()
        .config(BridgeConfig::from_json_str(CONFIG).unwrap())
        .gateway(gateway)
        .build()
}

fn request() -> TransferRequest {
    request_with(|r| r)
}

/// Builds a valid sepolia -> basesepolia request after applying `edit` to its fields.
fn request_with(edit: impl FnOnce(RequestFields) -> RequestFields) -> TransferRequest {
    let fields = edit(RequestFields {
        token: "USDC",
        origin: "sepolia",
        destination: "basesepolia",
        receiver: RECEIVER,
        sender: SENDER_KEY,
        amount: "1.5",
        unit: AmountUnit::Human,
    });

    TransferRequest::builder()
        .token(fields.token)
        .origin(fields.origin)
        .destination(fields.destination)
        .receiver(fields.receiver)
        .sender(fields.sender)
        .amount(fields.amount)
        .unit(fields.unit)
        .build()
}

struct RequestFields {
    token: &'static str,
    origin: &'static str,
    destination: &'static str,
    receiver: &'static str,
    sender: &'static str,
    amount: &'static str,
    unit: AmountUnit,
}

fn dispatch_id_log(emitter: Address, message_id: B256) -> Log {
    Log::new_unchecked(
        emitter,
        vec![keccak256("DispatchId(bytes32)"), message_id],
        Bytes::new(),
    )
}

// ============================================================================
// Precheck
// ============================================================================

#[tokio::test]
async fn test_precheck_passes_without_writes() {
    let gateway = funded_gateway();
    let service = create_test_service(gateway.clone());

    let report = service.precheck(&request()).await.unwrap();

    assert_eq!(report.sender, SENDER);
    assert_eq!(report.amount, U256::from(1_500_000u64));
    assert_eq!(report.destination_domain, BASE_DOMAIN);
    assert_eq!(report.fee, parse_ether("0.01").unwrap());
    assert!(gateway.writes().is_empty(), "precheck must not write");
}

#[tokio::test]
async fn test_precheck_is_repeatable() {
    let gateway = funded_gateway();
    let service = create_test_service(gateway.clone());

    let first = service.precheck(&request()).await.unwrap();
    let second = service.precheck(&request()).await.unwrap();

    assert_eq!(first, second);
    assert!(gateway.writes().is_empty());
}

#[tokio::test]
async fn test_precheck_reads_in_order_on_origin_chain() {
    let gateway = funded_gateway();
    let service = create_test_service(gateway.clone());

    service.precheck(&request()).await.unwrap();

    let chain = "sepolia".to_string();
    assert_eq!(
        gateway.calls(),
        vec![
            GatewayCall::Routers {
                chain: chain.clone(),
                router: SEPOLIA_ROUTER,
                domain: BASE_DOMAIN,
            },
            GatewayCall::Decimals {
                chain: chain.clone(),
                token: SEPOLIA_USDC,
            },
            GatewayCall::BalanceOf {
                chain: chain.clone(),
                router: SEPOLIA_ROUTER,
                account: SENDER,
            },
            GatewayCall::QuoteGasPayment {
                chain: chain.clone(),
                router: SEPOLIA_ROUTER,
                domain: BASE_DOMAIN,
            },
            GatewayCall::NativeBalance {
                chain,
                holder: SENDER,
            },
        ]
    );
}

#[tokio::test]
async fn test_precheck_accepts_address_sender() {
    let gateway = funded_gateway();
    let service = create_test_service(gateway.clone());
    let request = request_with(|r| RequestFields {
        sender: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
        ..r
    });

    let report = service.precheck(&request).await.unwrap();
    assert_eq!(report.sender, SENDER);
}

#[rstest]
#[case::token("token")]
#[case::origin("origin")]
#[case::destination("destination")]
#[case::receiver("receiver")]
#[case::sender("sender")]
#[case::amount("amount")]
#[tokio::test]
async fn test_precheck_missing_field(#[case] field: &str) {
    let gateway = funded_gateway();
    let service = create_test_service(gateway.clone());
    let request = request_with(|r| match field {
        "token" => RequestFields { token: "", ..r },
        "origin" => RequestFields { origin: "", ..r },
        "destination" => RequestFields { destination: "", ..r },
        "receiver" => RequestFields { receiver: "", ..r },
        "sender" => RequestFields { sender: "", ..r },
        _ => RequestFields { amount: "", ..r },
    });

    let err = service.precheck(&request).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        format!("Transfer precheck failed: {field} is required and cannot be empty")
    );
    assert!(gateway.calls().is_empty(), "input errors must fail before any RPC");
}

#[tokio::test]
async fn test_precheck_empty_amount_message() {
    let service = create_test_service(funded_gateway());
    let err = service
        .precheck(&request_with(|r| RequestFields { amount: "", ..r }))
        .await
        .unwrap_err();

    assert_snapshot!(err.to_string(), @"Transfer precheck failed: amount is required and cannot be empty");
}

#[rstest]
#[case("-1.0")]
#[case("0")]
#[case("0.000")]
#[case("one")]
#[tokio::test]
async fn test_precheck_rejects_non_positive_amount(#[case] amount: &'static str) {
    let gateway = funded_gateway();
    let service = create_test_service(gateway.clone());

    let err = service
        .precheck(&request_with(|r| RequestFields { amount, ..r }))
        .await
        .unwrap_err();

    assert!(
        err.to_string().contains("Amount must be a positive number"),
        "unexpected error: {err}"
    );
    assert!(matches!(err.root_cause(), BridgeError::InvalidAmount(_)));
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_precheck_same_chain() {
    let service = create_test_service(funded_gateway());

    // The receiver is also invalid, but chain distinctness is checked first
    let err = service
        .precheck(&request_with(|r| RequestFields {
            destination: "sepolia",
            receiver: "not-an-address",
            ..r
        }))
        .await
        .unwrap_err();

    assert_snapshot!(err.to_string(), @"Transfer precheck failed: Origin and destination chains must be different");
}

#[rstest]
#[case::missing_prefix("70997970C51812dc3A010C7d01b50e0d17dc79C8")]
#[case::too_short("0x70997970C51812dc3A010C7d01b50e0d17dc79")]
#[case::bad_checksum("0x70997970C51812dc3A010C7d01b50e0d17dc79c8")]
#[case::not_hex("0xzz997970c51812dc3a010c7d01b50e0d17dc79c8")]
#[tokio::test]
async fn test_precheck_invalid_receiver(#[case] receiver: &'static str) {
    let gateway = funded_gateway();
    let service = create_test_service(gateway.clone());

    let err = service
        .precheck(&request_with(|r| RequestFields { receiver, ..r }))
        .await
        .unwrap_err();

    assert!(
        err.to_string()
            .contains("Receiver address must be a valid Ethereum address"),
        "unexpected error: {err}"
    );
    assert!(gateway.calls().is_empty());
}

#[rstest]
#[case::garbage("definitely not a key")]
#[case::short_hex("0x1234")]
#[case::zero_scalar("0x0000000000000000000000000000000000000000000000000000000000000000")]
#[case::above_curve_order("0xffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff")]
#[tokio::test]
async fn test_precheck_invalid_sender(#[case] sender: &'static str) {
    let service = create_test_service(funded_gateway());

    let err = service
        .precheck(&request_with(|r| RequestFields { sender, ..r }))
        .await
        .unwrap_err();

    assert!(matches!(err, BridgeError::PrecheckFailed(_)));
    assert!(matches!(err.root_cause(), BridgeError::InvalidSender(_)));
}

#[tokio::test]
async fn test_precheck_no_router_for_destination() {
    let gateway = funded_gateway();
    gateway.set_remote_router(SEPOLIA_ROUTER, BASE_DOMAIN, B256::ZERO);
    let service = create_test_service(gateway.clone());

    let err = service.precheck(&request()).await.unwrap_err();

    assert_snapshot!(err.to_string(), @"Transfer precheck failed: No router enrolled for USDC towards basesepolia (domain 84532)");
    assert_eq!(gateway.decimals_calls(), 0, "must stop at the router check");
}

#[tokio::test]
async fn test_precheck_unconfigured_destination_chain() {
    let service = create_test_service(funded_gateway());

    let err = service
        .precheck(&request_with(|r| RequestFields {
            destination: "mainnet",
            ..r
        }))
        .await
        .unwrap_err();

    assert_snapshot!(err.to_string(), @"Transfer precheck failed: Configuration not found: chain 'mainnet' is not configured");
}

#[tokio::test]
async fn test_precheck_tolerates_token_missing_on_origin() {
    // WETH is only deployed on basesepolia, so the origin lookup falls back
    // to the zero address and the remaining checks run against it.
    let gateway = FakeGateway::new();
    gateway.set_remote_router(Address::ZERO, BASE_DOMAIN, remote_router());
    gateway.set_router_balance(Address::ZERO, SENDER, U256::from(5u64));
    let service = create_test_service(gateway.clone());

    let request = request_with(|r| RequestFields {
        token: "WETH",
        amount: "5",
        unit: AmountUnit::Base,
        ..r
    });

    let report = service.precheck(&request).await.unwrap();

    assert_eq!(report.amount, U256::from(5u64));
    assert_eq!(report.fee, U256::ZERO);
    assert_eq!(
        gateway.calls()[0],
        GatewayCall::Routers {
            chain: "sepolia".to_string(),
            router: Address::ZERO,
            domain: BASE_DOMAIN,
        }
    );
}

#[tokio::test]
async fn test_precheck_insufficient_token_balance() {
    let gateway = funded_gateway();
    gateway.set_router_balance(SEPOLIA_ROUTER, SENDER, U256::from(1_000_000u64));
    let service = create_test_service(gateway.clone());

    let err = service.precheck(&request()).await.unwrap_err();

    assert_snapshot!(err.to_string(), @"Transfer precheck failed: Insufficient token balance: have 1000000, need 1500000 (base units)");
    assert_eq!(gateway.quote_calls(), 0);
}

#[tokio::test]
async fn test_precheck_insufficient_native_balance() {
    let gateway = funded_gateway();
    gateway.set_native_balance(SENDER, parse_ether("0.005").unwrap());
    let service = create_test_service(gateway);

    let err = service.precheck(&request()).await.unwrap_err();

    assert_snapshot!(err.to_string(), @"Transfer precheck failed: Insufficient native balance for interchain fee: have 0.005, need 0.01");
}

#[tokio::test]
async fn test_precheck_wraps_rpc_failures() {
    let gateway = funded_gateway();
    gateway.fail_on("quoteGasPayment");
    let service = create_test_service(gateway);

    let err = service.precheck(&request()).await.unwrap_err();

    assert_snapshot!(err.to_string(), @"Transfer precheck failed: Failed to quote interchain gas payment: simulated RPC error");
    assert!(matches!(err.root_cause(), BridgeError::ContractCall { .. }));
}

#[tokio::test]
async fn test_precheck_base_units_skip_decimals_lookup() {
    let gateway = funded_gateway();
    let service = create_test_service(gateway.clone());

    let report = service
        .precheck(&request_with(|r| RequestFields {
            amount: "1000000",
            unit: AmountUnit::Base,
            ..r
        }))
        .await
        .unwrap();

    assert_eq!(report.amount, U256::from(1_000_000u64));
    assert_eq!(gateway.decimals_calls(), 0);
}

#[rstest]
#[case("1.5000000")]
#[case("1.500000000000000000000")]
#[tokio::test]
async fn test_precheck_accepts_zero_padding_past_token_decimals(#[case] amount: &'static str) {
    let gateway = funded_gateway();
    let service = create_test_service(gateway.clone());

    let report = service
        .precheck(&request_with(|r| RequestFields { amount, ..r }))
        .await
        .unwrap();

    assert_eq!(report.amount, U256::from(1_500_000u64));
}

// ============================================================================
// Transfer
// ============================================================================

#[tokio::test]
async fn test_transfer_with_sufficient_allowance() {
    let gateway = funded_gateway();
    gateway.set_allowance(SEPOLIA_USDC, SENDER, SEPOLIA_ROUTER, U256::from(1_500_000u64));
    gateway.set_receipt_logs(vec![dispatch_id_log(SEPOLIA_MAILBOX, MESSAGE_ID)]);
    let service = create_test_service(gateway.clone());

    let outcome = service.transfer(&request()).await.unwrap();

    assert_eq!(outcome.tx_hash, FAKE_TRANSFER_TX_HASH);
    assert_eq!(outcome.message_id, Some(MESSAGE_ID));
    assert!(gateway.approvals().is_empty(), "allowance already covers the amount");
    assert_eq!(gateway.quote_calls(), 1);
    assert_eq!(
        gateway.writes(),
        vec![GatewayCall::TransferRemote {
            chain: "sepolia".to_string(),
            router: SEPOLIA_ROUTER,
            domain: BASE_DOMAIN,
            recipient: RECEIVER_ADDRESS.into_word(),
            amount: U256::from(1_500_000u64),
            fee: parse_ether("0.01").unwrap(),
            from: SENDER,
        }]
    );
}

#[tokio::test]
async fn test_transfer_approves_exact_amount_first() {
    let gateway = funded_gateway();
    gateway.set_allowance(SEPOLIA_USDC, SENDER, SEPOLIA_ROUTER, U256::from(1_000_000u64));
    let service = create_test_service(gateway.clone());

    service.transfer(&request()).await.unwrap();

    assert_eq!(
        gateway.approvals(),
        vec![(SEPOLIA_USDC, SEPOLIA_ROUTER, U256::from(1_500_000u64))]
    );

    let writes = gateway.writes();
    assert_eq!(writes.len(), 2);
    assert!(matches!(writes[0], GatewayCall::Approve { .. }));
    assert!(matches!(writes[1], GatewayCall::TransferRemote { .. }));
}

#[tokio::test]
async fn test_transfer_recipient_is_left_padded() {
    let gateway = funded_gateway();
    let service = create_test_service(gateway.clone());

    service.transfer(&request()).await.unwrap();

    let recipient = gateway
        .writes()
        .into_iter()
        .find_map(|call| match call {
            GatewayCall::TransferRemote { recipient, .. } => Some(recipient),
            _ => None,
        })
        .unwrap();

    assert_eq!(&recipient[..12], &[0u8; 12]);
    assert_eq!(&recipient[12..], RECEIVER_ADDRESS.as_slice());
}

#[tokio::test]
async fn test_transfer_without_matching_log_has_no_message_id() {
    let gateway = funded_gateway();
    // Right topics, wrong emitter
    gateway.set_receipt_logs(vec![dispatch_id_log(SEPOLIA_ROUTER, MESSAGE_ID)]);
    let service = create_test_service(gateway);

    let outcome = service.transfer(&request()).await.unwrap();

    assert_eq!(outcome.tx_hash, FAKE_TRANSFER_TX_HASH);
    assert_eq!(outcome.message_id, None);
}

#[tokio::test]
async fn test_transfer_without_mailbox_has_no_message_id() {
    let gateway = FakeGateway::new();
    gateway.set_decimals(ARB_USDC, 6);
    gateway.set_receipt_logs(vec![dispatch_id_log(SEPOLIA_MAILBOX, MESSAGE_ID)]);
    let service = create_test_service(gateway.clone());

    let outcome = service
        .transfer(&request_with(|r| RequestFields {
            origin: "arbsepolia",
            ..r
        }))
        .await
        .unwrap();

    assert_eq!(outcome.message_id, None);
    assert_eq!(
        gateway.count(|c| matches!(
            c,
            GatewayCall::TransferRemote { router, .. } if *router == ARB_ROUTER
        )),
        1
    );
}

#[tokio::test]
async fn test_transfer_base_units_skip_decimals_lookup() {
    let gateway = funded_gateway();
    let service = create_test_service(gateway.clone());

    service
        .transfer(&request_with(|r| RequestFields {
            amount: "1000000",
            unit: AmountUnit::Base,
            ..r
        }))
        .await
        .unwrap();

    assert_eq!(gateway.decimals_calls(), 0);
    assert_eq!(
        gateway.approvals(),
        vec![(SEPOLIA_USDC, SEPOLIA_ROUTER, U256::from(1_000_000u64))]
    );
}

#[tokio::test]
async fn test_transfer_requires_private_key() {
    let gateway = funded_gateway();
    let service = create_test_service(gateway.clone());

    let err = service
        .transfer(&request_with(|r| RequestFields {
            sender: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
            ..r
        }))
        .await
        .unwrap_err();

    assert!(matches!(err, BridgeError::InvalidSender(_)));
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_transfer_approval_failure_stops_transfer() {
    let gateway = funded_gateway();
    gateway.fail_on("approve");
    let service = create_test_service(gateway.clone());

    let err = service.transfer(&request()).await.unwrap_err();

    assert_snapshot!(err.to_string(), @"Failed to approve token: simulated RPC error");
    assert_eq!(gateway.quote_calls(), 0);
    assert_eq!(
        gateway.count(|c| matches!(c, GatewayCall::TransferRemote { .. })),
        0
    );
}

#[tokio::test]
async fn test_transfer_errors_are_not_precheck_wrapped() {
    let gateway = funded_gateway();
    gateway.fail_on("transferRemote");
    let service = create_test_service(gateway);

    let err = service.transfer(&request()).await.unwrap_err();

    assert_snapshot!(err.to_string(), @"Failed to submit remote transfer: simulated RPC error");
}

#[tokio::test]
async fn test_transfer_skips_same_chain_check() {
    // Execution only validates inputs; routing problems are the precheck's job
    let gateway = funded_gateway();
    let service = create_test_service(gateway.clone());

    let outcome = service
        .transfer(&request_with(|r| RequestFields {
            destination: "sepolia",
            ..r
        }))
        .await
        .unwrap();

    assert_eq!(outcome.tx_hash, FAKE_TRANSFER_TX_HASH);
    assert_eq!(
        gateway.count(|c| matches!(
            c,
            GatewayCall::QuoteGasPayment { domain, .. } if *domain == SEPOLIA_DOMAIN
        )),
        1
    );
}

// ============================================================================
// Queries
// ============================================================================

#[tokio::test]
async fn test_supported_destinations_names_configured_domains() {
    let gateway = FakeGateway::new();
    gateway.set_domains(SEPOLIA_ROUTER, vec![BASE_DOMAIN, ARB_DOMAIN, 999]);
    let service = create_test_service(gateway);

    let destinations = service
        .supported_destinations("USDC", "sepolia")
        .await
        .unwrap();

    let named: Vec<_> = destinations
        .iter()
        .map(|d| (d.domain_id, d.chain.as_deref()))
        .collect();
    assert_eq!(
        named,
        vec![
            (BASE_DOMAIN, Some("basesepolia")),
            (ARB_DOMAIN, Some("arbsepolia")),
            (999, None),
        ]
    );
}

#[tokio::test]
async fn test_token_balance_is_human_readable() {
    let gateway = FakeGateway::new();
    gateway.set_decimals(SEPOLIA_USDC, 6);
    gateway.set_token_balance(SEPOLIA_USDC, SENDER, U256::from(2_500_000u64));
    let service = create_test_service(gateway);

    let balance = service
        .token_balance("USDC", "sepolia", SENDER)
        .await
        .unwrap();

    assert_eq!(balance, "2.5");
}

#[tokio::test]
async fn test_token_balance_unknown_token() {
    let service = create_test_service(FakeGateway::new());

    let err = service
        .token_balance("DAI", "sepolia", SENDER)
        .await
        .unwrap_err();

    assert_snapshot!(err.to_string(), @"Configuration not found: token 'DAI' is not configured");
}

#[test]
fn test_amount_round_trip() {
    let base = to_base_units("1", 6).unwrap();
    assert_eq!(base, U256::from(1_000_000u64));
    assert_eq!(from_base_units(base, 6).unwrap(), "1");
}
