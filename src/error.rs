use alloy_primitives::U256;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Configuration not found: {0}")]
    ConfigNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Credential not set: environment variable {var} is missing or empty")]
    MissingCredential { var: String },

    #[error("{name} is required and cannot be empty")]
    MissingParameter { name: &'static str },

    #[error("Amount must be a positive number, got '{0}'")]
    InvalidAmount(String),

    #[error("Origin and destination chains must be different")]
    SameChain,

    #[error("Receiver address must be a valid Ethereum address with 0x prefix, got '{0}'")]
    InvalidReceiver(String),

    #[error("Sender must be a valid address or private key: {0}")]
    InvalidSender(String),

    #[error("No router enrolled for {token} towards {destination} (domain {domain})")]
    NoRouterForDestination {
        token: String,
        destination: String,
        domain: u32,
    },

    #[error("Insufficient token balance: have {balance}, need {required} (base units)")]
    InsufficientTokenBalance { balance: U256, required: U256 },

    #[error("Insufficient native balance for interchain fee: have {balance}, need {required}")]
    InsufficientNativeBalance { balance: String, required: String },

    #[error("{context}: {reason}")]
    ContractCall { context: &'static str, reason: String },

    #[error("Message id extraction failed: {0}")]
    MessageIdExtraction(String),

    #[error("Amount conversion failed: {0}")]
    Conversion(String),

    #[error("Transfer precheck failed: {0}")]
    PrecheckFailed(Box<BridgeError>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Wraps any displayable failure of an on-chain call with an operation-specific prefix.
    pub fn contract_call(context: &'static str, reason: impl std::fmt::Display) -> Self {
        Self::ContractCall {
            context,
            reason: reason.to_string(),
        }
    }

    /// Returns the error a precheck failure wraps, or `self` for any other variant.
    pub fn root_cause(&self) -> &BridgeError {
        match self {
            Self::PrecheckFailed(inner) => inner.root_cause(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
