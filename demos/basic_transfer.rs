//! Basic example of a cross-chain transfer using warp-bridge
//!
//! Loads the chain and asset configuration, prechecks a USDC transfer from
//! Sepolia to Base Sepolia, and sends it only when `EXECUTE=1` is set.
//!
//! Run with: `cargo run --example basic_transfer -- bridge.json`
//!
//! The sender key is read from `PRIVATE_KEY` (a `.env` file works too).

use tracing_subscriber::EnvFilter;
use warp_bridge::{
    credential_from_env, AlloyGateway, BridgeConfig, BridgeError, BridgeService, TransferRequest,
    DEFAULT_CREDENTIAL_VAR,
};

#[tokio::main]
async fn main() -> Result<(), BridgeError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("🌉 Warp Route Transfer Example - Sepolia to Base Sepolia");
    println!("=======================================================\n");

    // Step 1: Load configuration
    println!("1️⃣ Loading configuration...");
    let path = std::env::args().nth(1).unwrap_or_else(|| "bridge.json".to_string());
    let config = BridgeConfig::from_path(&path)?;
    for name in config.chain_names() {
        let chain = config.resolve_chain(name)?;
        println!(
            "   {name}: chain {} / domain {} via {}",
            chain.chain(),
            chain.domain_id(),
            chain.rpc_url()
        );
    }

    // Step 2: Build the service
    println!("\n2️⃣ Creating bridge service...");
    let service = BridgeService::builder()
        .config(config)
        .gateway(AlloyGateway::new())
        .build();

    let destinations = service.supported_destinations("USDC", "sepolia").await?;
    println!("   USDC on sepolia can reach:");
    for destination in &destinations {
        println!(
            "   - domain {} ({})",
            destination.domain_id,
            destination.chain.as_deref().unwrap_or("not configured")
        );
    }

    // Step 3: Precheck
    println!("\n3️⃣ Running precheck...");
    let request = TransferRequest::builder()
        .token("USDC")
        .origin("sepolia")
        .destination("basesepolia")
        .receiver("0x70997970C51812dc3A010C7d01b50e0d17dc79C8")
        .sender(credential_from_env(DEFAULT_CREDENTIAL_VAR)?)
        .amount("1")
        .build();

    let report = service.precheck(&request).await?;
    println!("   Sender: {}", report.sender);
    println!("   Amount: {} base units", report.amount);
    println!("   Destination domain: {}", report.destination_domain);
    println!("   Interchain fee: {} wei", report.fee);

    if std::env::var("EXECUTE").as_deref() != Ok("1") {
        println!("\n✅ Precheck passed. Set EXECUTE=1 to send the transfer.");
        return Ok(());
    }

    // Step 4: Transfer
    println!("\n4️⃣ Sending transfer...");
    let outcome = service.transfer(&request).await?;
    println!("   Transaction: {}", outcome.tx_hash);
    match outcome.message_id {
        Some(id) => println!("   Message id: {id}"),
        None => println!("   Message id: not found in receipt"),
    }

    println!("\n✅ Transfer submitted!");
    Ok(())
}
