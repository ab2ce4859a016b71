//! Protocol-level value handling
//!
//! Amount conversion between display and base units, and the address rules
//! applied to receivers and senders before anything touches a chain.

mod address;
mod units;

pub use address::{address_to_bytes32, is_valid_address, parse_receiver, SenderCredential};
pub use units::{
    amount_in_base_units, from_base_units, parse_base_units, to_base_units, AmountUnit,
    NATIVE_DECIMALS,
};
