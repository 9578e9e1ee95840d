//! Address codecs and classifiers for Bitcoin Cash.
//!
//! Converts between the legacy base58check and cashaddr encodings,
//! classifies addresses by network and script type, and derives addresses
//! from BIP32 extended keys and raw output scripts.
//!
//! # Examples
//!
//! Convert a cashaddr address to its legacy form:
//!
//! ```rust
//! use bch_addr::to_legacy_address;
//!
//! let legacy =
//!     to_legacy_address("bitcoincash:qpm2qsznhks23z7629mms6s4cwef74vcwvy22gdx6a").unwrap();
//! assert_eq!(legacy, "1BpEi6DfDAUFd7GtittLSdBeYJvcoaVggu");
//! ```
//!
//! Decode an address and inspect its parts:
//!
//! ```rust
//! use bch_addr::{Address, Network, ScriptType};
//!
//! let address: Address = "1BpEi6DfDAUFd7GtittLSdBeYJvcoaVggu".parse().unwrap();
//! assert_eq!(address.network, Network::Mainnet);
//! assert_eq!(address.script_type, ScriptType::P2PKH);
//! ```

pub mod address;
pub mod network;

pub use crate::address::derivation::{
    from_extended_private_key, from_extended_public_key, from_output_script,
};
pub use crate::address::{
    cash_to_hash160, detect_address_format, detect_address_network, detect_address_type,
    hash160_to_cash, hash160_to_legacy, is_cash_address, is_hash160, is_legacy_address,
    is_mainnet_address, is_p2pkh_address, is_p2sh_address, is_regtest_address,
    is_testnet_address, legacy_to_hash160, to_cash_address, to_legacy_address, Address,
    AddressError, AddressFormat, Base58Codec, CashAddrCodec, CashAddrFormat, ScriptType,
};
pub use crate::network::Network;
