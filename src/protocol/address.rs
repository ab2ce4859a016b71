//! Address predicates, sender credentials and recipient encoding

use std::fmt;

use alloy_primitives::{Address, B256};
use alloy_signer_local::PrivateKeySigner;

use crate::error::{BridgeError, Result};

/// Returns true if `value` is a 20-byte hex address, with or without `0x`.
///
/// Mixed-case input must carry a valid EIP-55 checksum; all-lowercase and
/// all-uppercase input is accepted as is.
pub fn is_valid_address(value: &str) -> bool {
    let hex = value.strip_prefix("0x").unwrap_or(value);
    if hex.len() != 40 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return false;
    }

    let has_lower = hex.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = hex.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Address::parse_checksummed(format!("0x{hex}"), None).is_ok();
    }

    true
}

/// Validates a receiver address, which must also carry an explicit `0x` prefix.
pub fn parse_receiver(value: &str) -> Result<Address> {
    let value = value.trim();
    if !value.starts_with("0x") || !is_valid_address(value) {
        return Err(BridgeError::InvalidReceiver(value.to_string()));
    }

    value
        .parse()
        .map_err(|_| BridgeError::InvalidReceiver(value.to_string()))
}

/// Left-pads an address into the 32-byte recipient encoding routers expect.
pub fn address_to_bytes32(address: Address) -> B256 {
    address.into_word()
}

/// Who is sending a transfer.
///
/// An address is enough to run read-only checks; submitting transactions
/// requires a private key.
#[derive(Clone)]
pub enum SenderCredential {
    Address(Address),
    PrivateKey(PrivateKeySigner),
}

impl SenderCredential {
    /// Interprets `credential` as an address if it is one, otherwise as a private key.
    ///
    /// Any failure to derive a key, including a well-formed scalar outside the
    /// curve order, is reported as [`BridgeError::InvalidSender`].
    pub fn parse(credential: &str) -> Result<Self> {
        let credential = credential.trim();

        if is_valid_address(credential) {
            let address = credential
                .parse()
                .map_err(|e| BridgeError::InvalidSender(format!("{e}")))?;
            return Ok(Self::Address(address));
        }

        credential
            .parse::<PrivateKeySigner>()
            .map(Self::PrivateKey)
            .map_err(|_| {
                BridgeError::InvalidSender("value is neither an address nor a private key".to_string())
            })
    }

    /// The sending account.
    pub fn address(&self) -> Address {
        match self {
            Self::Address(address) => *address,
            Self::PrivateKey(signer) => signer.address(),
        }
    }

    /// The signer, if the credential can sign.
    pub fn signer(&self) -> Option<&PrivateKeySigner> {
        match self {
            Self::Address(_) => None,
            Self::PrivateKey(signer) => Some(signer),
        }
    }

    /// Like [`SenderCredential::signer`], but failing for address-only credentials.
    pub fn require_signer(&self) -> Result<&PrivateKeySigner> {
        self.signer().ok_or_else(|| {
            BridgeError::InvalidSender(format!(
                "{} is an address; a private key is required to submit transactions",
                self.address()
            ))
        })
    }
}

impl fmt::Debug for SenderCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(address) => f.debug_tuple("Address").field(address).finish(),
            Self::PrivateKey(signer) => f
                .debug_struct("PrivateKey")
                .field("address", &signer.address())
                .finish_non_exhaustive(),
        }
    }
}
