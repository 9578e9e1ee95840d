//! Adapters from external inputs to addresses: BIP32 extended keys and
//! raw output scripts. Key parsing, derivation and script classification
//! are delegated to the `bitcoin` crate; only the resulting pubkey bytes
//! and embedded hashes are consumed here.

use std::str::FromStr;

use bitcoin::blockdata::script::Script;
use bitcoin::network::constants::Network as BitcoinNetwork;
use bitcoin::util::bip32::{ChildNumber, ExtendedPrivKey, ExtendedPubKey};
use bitcoin::util::key::PublicKey;
use bitcoin_hashes::{hash160, Hash};
use lazy_static::lazy_static;
use log::debug;
use bitcoin::secp256k1::{All, Secp256k1};

use crate::address::errors::AddressError;
use crate::address::{Address, ScriptType};
use crate::network::Network;

lazy_static! {
    static ref SECP: Secp256k1<All> = Secp256k1::new();
}

/// External non-hardened receive chain, first address.
const DEFAULT_PUBLIC_PATH: &str = "0/0";
/// Hardened variant used when deriving from a private key.
const DEFAULT_HARDENED_PATH: &str = "0'/0";

/// Derives a P2PKH address from an extended public key. The path defaults
/// to `0/0`; the network comes from the key's version bytes.
pub fn from_extended_public_key(
    xpub: &str,
    path: Option<&str>,
) -> Result<Address, AddressError> {
    let key = ExtendedPubKey::from_str(xpub).map_err(|_| AddressError::InvalidExtendedKey)?;
    let children = parse_path(path.unwrap_or(DEFAULT_PUBLIC_PATH))?;
    let derived = key
        .derive_pub(&SECP, &children)
        .map_err(|_| AddressError::InvalidDerivationPath)?;
    debug!("derived pubkey at depth {}", derived.depth);
    Ok(address_for_pubkey(&derived.public_key, derived.network))
}

/// Derives a P2PKH address from an extended private key. The path
/// defaults to the hardened `0'/0`.
pub fn from_extended_private_key(
    xpriv: &str,
    path: Option<&str>,
) -> Result<Address, AddressError> {
    let key = ExtendedPrivKey::from_str(xpriv).map_err(|_| AddressError::InvalidExtendedKey)?;
    let children = parse_path(path.unwrap_or(DEFAULT_HARDENED_PATH))?;
    let derived = key
        .derive_priv(&SECP, &children)
        .map_err(|_| AddressError::InvalidDerivationPath)?;
    let pubkey = ExtendedPubKey::from_private(&SECP, &derived);
    Ok(address_for_pubkey(&pubkey.public_key, pubkey.network))
}

/// Classifies an output script as P2PKH or P2SH and lifts the embedded
/// hash160 into an address for the requested network.
pub fn from_output_script(script: &[u8], network: Network) -> Result<Address, AddressError> {
    let script = Script::from(script.to_vec());
    let bytes = script.as_bytes();
    if script.is_p2pkh() {
        // OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG
        let mut hash160 = [0; 20];
        hash160.copy_from_slice(&bytes[3..23]);
        Ok(Address::new(network, ScriptType::P2PKH, hash160))
    } else if script.is_p2sh() {
        // OP_HASH160 <20 bytes> OP_EQUAL
        let mut hash160 = [0; 20];
        hash160.copy_from_slice(&bytes[2..22]);
        Ok(Address::new(network, ScriptType::P2SH, hash160))
    } else {
        Err(AddressError::UnrecognizedScript)
    }
}

fn address_for_pubkey(pubkey: &PublicKey, network: BitcoinNetwork) -> Address {
    let digest = hash160::Hash::hash(&pubkey.key.serialize());
    let mut hash160 = [0; 20];
    hash160.copy_from_slice(&digest[..]);
    Address::new(convert_network(network), ScriptType::P2PKH, hash160)
}

/// Extended-key version bytes only distinguish mainnet from testnet;
/// regtest keys carry testnet bytes.
fn convert_network(network: BitcoinNetwork) -> Network {
    match network {
        BitcoinNetwork::Bitcoin => Network::Mainnet,
        BitcoinNetwork::Testnet | BitcoinNetwork::Regtest => Network::Testnet,
    }
}

fn parse_path(path: &str) -> Result<Vec<ChildNumber>, AddressError> {
    path.split('/')
        .map(|index| {
            ChildNumber::from_str(index).map_err(|_| AddressError::InvalidDerivationPath)
        })
        .collect()
}
