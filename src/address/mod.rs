//! Address encoding, decoding and classification.
//!
//! The two supported encodings (legacy base58check and cashaddr) both
//! project onto the same `(network, script type, hash160)` triple;
//! [`Address::decode`] is the unification point the codecs feed into and
//! everything else in this module is layered on top of it.

pub mod base58;
pub mod cashaddr;
pub mod derivation;
pub mod errors;

use std::fmt;
use std::str::FromStr;

use log::trace;

pub use self::base58::Base58Codec;
pub use self::cashaddr::CashAddrCodec;
pub use self::errors::AddressError;

use crate::network::{
    Network, MAINNET_P2PKH, MAINNET_P2SH, TESTNET_P2PKH, TESTNET_P2SH,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptType {
    /// Pay-to-pubkey-hash output.
    P2PKH,
    /// Pay-to-script-hash output.
    P2SH,
}

impl ScriptType {
    fn cashaddr_version(self) -> u8 {
        match self {
            ScriptType::P2PKH => cashaddr::VERSION_P2PKH,
            ScriptType::P2SH => cashaddr::VERSION_P2SH,
        }
    }

    fn legacy_version(self, network: Network) -> u8 {
        match self {
            ScriptType::P2PKH => network.legacy_p2pkh_version(),
            ScriptType::P2SH => network.legacy_p2sh_version(),
        }
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let printable = match self {
            ScriptType::P2PKH => "p2pkh",
            ScriptType::P2SH => "p2sh",
        };
        write!(f, "{}", printable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFormat {
    Legacy,
    CashAddr,
}

impl fmt::Display for AddressFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let printable = match self {
            AddressFormat::Legacy => "legacy",
            AddressFormat::CashAddr => "cashaddr",
        };
        write!(f, "{}", printable)
    }
}

/// Formatting options for cashaddr output.
#[derive(Debug, Clone, Copy)]
pub struct CashAddrFormat {
    /// Emit the human-readable network prefix. Default `true`.
    pub with_prefix: bool,
    /// Force the `bchreg` prefix. Default `false`; the only way a legacy
    /// address can be rendered as regtest, since its version bytes cannot
    /// express the distinction.
    pub as_regtest: bool,
}

impl Default for CashAddrFormat {
    fn default() -> Self {
        CashAddrFormat {
            with_prefix: true,
            as_regtest: false,
        }
    }
}

/// A decoded address: the network, script type and hash160 payload shared
/// by both string encodings, plus the encoding the string arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address {
    pub network: Network,
    pub script_type: ScriptType,
    pub format: AddressFormat,
    hash160: [u8; 20],
}

impl Address {
    pub fn new(network: Network, script_type: ScriptType, hash160: [u8; 20]) -> Self {
        Address {
            network,
            script_type,
            format: AddressFormat::CashAddr,
            hash160,
        }
    }

    /// Decodes any supported address string: cashaddr first (including the
    /// bare-payload form tried against every known prefix), legacy
    /// base58check as the fallback.
    pub fn decode(input: &str) -> Result<Self, AddressError> {
        if input.is_empty() {
            return Err(AddressError::UnrecognizedAddress);
        }
        match CashAddrCodec::decode(input) {
            Ok((network, version_byte, hash160)) => Ok(Address {
                network,
                script_type: if version_byte & cashaddr::VERSION_P2SH != 0 {
                    ScriptType::P2SH
                } else {
                    ScriptType::P2PKH
                },
                format: AddressFormat::CashAddr,
                hash160,
            }),
            // An explicit prefix marks the input as cashaddr; surface the
            // codec's own failure instead of falling through.
            Err(err) if input.contains(':') => Err(err),
            Err(_) => {
                trace!("cashaddr decode failed, trying base58check");
                let (version_byte, hash160) =
                    Base58Codec::decode(input).map_err(|err| match err {
                        AddressError::InvalidCharacter => AddressError::UnrecognizedAddress,
                        other => other,
                    })?;
                let (network, script_type) = match version_byte {
                    MAINNET_P2PKH => (Network::Mainnet, ScriptType::P2PKH),
                    MAINNET_P2SH => (Network::Mainnet, ScriptType::P2SH),
                    // Legacy bytes cannot tell testnet and regtest apart;
                    // testnet wins by convention.
                    TESTNET_P2PKH => (Network::Testnet, ScriptType::P2PKH),
                    TESTNET_P2SH => (Network::Testnet, ScriptType::P2SH),
                    _ => return Err(AddressError::UnrecognizedAddress),
                };
                Ok(Address {
                    network,
                    script_type,
                    format: AddressFormat::Legacy,
                    hash160,
                })
            }
        }
    }

    pub fn hash160(&self) -> &[u8; 20] {
        &self.hash160
    }

    pub fn encode_legacy(&self) -> String {
        Base58Codec::encode(self.script_type.legacy_version(self.network), &self.hash160)
    }

    pub fn encode_cash(&self, format: &CashAddrFormat) -> String {
        let network = if format.as_regtest {
            Network::Regtest
        } else {
            self.network
        };
        let encoded = CashAddrCodec::encode_hash(
            network.cashaddr_prefix(),
            self.script_type.cashaddr_version(),
            &self.hash160,
        );
        if format.with_prefix {
            encoded
        } else {
            let separator = encoded.find(':').map(|i| i + 1).unwrap_or(0);
            encoded[separator..].to_string()
        }
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::decode(s)
    }
}

/// Re-encodes any supported address in the legacy base58check form.
pub fn to_legacy_address(input: &str) -> Result<String, AddressError> {
    Ok(Address::decode(input)?.encode_legacy())
}

/// Re-encodes any supported address in the cashaddr form.
pub fn to_cash_address(input: &str, format: &CashAddrFormat) -> Result<String, AddressError> {
    Ok(Address::decode(input)?.encode_cash(format))
}

/// The hash160 of a legacy address, as lowercase hex.
pub fn legacy_to_hash160(input: &str) -> Result<String, AddressError> {
    let address = Address::decode(input)?;
    if address.format != AddressFormat::Legacy {
        return Err(AddressError::UnrecognizedAddress);
    }
    Ok(hex::encode(address.hash160))
}

/// The hash160 of a cashaddr address, as lowercase hex.
pub fn cash_to_hash160(input: &str) -> Result<String, AddressError> {
    let address = Address::decode(input)?;
    if address.format != AddressFormat::CashAddr {
        return Err(AddressError::UnrecognizedAddress);
    }
    Ok(hex::encode(address.hash160))
}

/// Encodes a hex hash160 as a legacy address under the given legacy
/// version byte (`MAINNET_P2PKH` for the common case).
pub fn hash160_to_legacy(hash160_hex: &str, version_byte: u8) -> Result<String, AddressError> {
    let hash160 = parse_hash160(hash160_hex)?;
    legacy_version_parts(version_byte)?;
    Ok(Base58Codec::encode(version_byte, &hash160))
}

/// Encodes a hex hash160 as a cashaddr address. The version byte is a
/// *legacy* version byte; it selects both network and script type.
pub fn hash160_to_cash(
    hash160_hex: &str,
    version_byte: u8,
    as_regtest: bool,
) -> Result<String, AddressError> {
    let hash160 = parse_hash160(hash160_hex)?;
    let (network, script_type) = legacy_version_parts(version_byte)?;
    let network = if as_regtest { Network::Regtest } else { network };
    Ok(CashAddrCodec::encode_hash(
        network.cashaddr_prefix(),
        script_type.cashaddr_version(),
        &hash160,
    ))
}

pub fn is_legacy_address(input: &str) -> Result<bool, AddressError> {
    Ok(Address::decode(input)?.format == AddressFormat::Legacy)
}

pub fn is_cash_address(input: &str) -> Result<bool, AddressError> {
    Ok(Address::decode(input)?.format == AddressFormat::CashAddr)
}

/// True for exactly 40 hex characters, false for anything that decodes as
/// an address, an error otherwise.
pub fn is_hash160(input: &str) -> Result<bool, AddressError> {
    if input.len() == 40 && input.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Ok(true);
    }
    Address::decode(input)?;
    Ok(false)
}

pub fn is_mainnet_address(input: &str) -> Result<bool, AddressError> {
    Ok(Address::decode(input)?.network == Network::Mainnet)
}

pub fn is_testnet_address(input: &str) -> Result<bool, AddressError> {
    Ok(Address::decode(input)?.network == Network::Testnet)
}

pub fn is_regtest_address(input: &str) -> Result<bool, AddressError> {
    Ok(Address::decode(input)?.network == Network::Regtest)
}

pub fn is_p2pkh_address(input: &str) -> Result<bool, AddressError> {
    Ok(Address::decode(input)?.script_type == ScriptType::P2PKH)
}

pub fn is_p2sh_address(input: &str) -> Result<bool, AddressError> {
    Ok(Address::decode(input)?.script_type == ScriptType::P2SH)
}

pub fn detect_address_format(input: &str) -> Result<AddressFormat, AddressError> {
    Ok(Address::decode(input)?.format)
}

pub fn detect_address_network(input: &str) -> Result<Network, AddressError> {
    Ok(Address::decode(input)?.network)
}

pub fn detect_address_type(input: &str) -> Result<ScriptType, AddressError> {
    Ok(Address::decode(input)?.script_type)
}

fn parse_hash160(hash160_hex: &str) -> Result<[u8; 20], AddressError> {
    let bytes = hex::decode(hash160_hex).map_err(|_| AddressError::InvalidCharacter)?;
    if bytes.len() != 20 {
        return Err(AddressError::InvalidLength);
    }
    let mut hash160 = [0; 20];
    hash160.copy_from_slice(&bytes);
    Ok(hash160)
}

fn legacy_version_parts(version_byte: u8) -> Result<(Network, ScriptType), AddressError> {
    match version_byte {
        MAINNET_P2PKH => Ok((Network::Mainnet, ScriptType::P2PKH)),
        MAINNET_P2SH => Ok((Network::Mainnet, ScriptType::P2SH)),
        TESTNET_P2PKH => Ok((Network::Testnet, ScriptType::P2PKH)),
        TESTNET_P2SH => Ok((Network::Testnet, ScriptType::P2SH)),
        _ => Err(AddressError::UnrecognizedAddress),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The cashaddr translation test vectors: legacy mainnet addresses and
    // their cashaddr forms, three P2PKH and three P2SH.
    const LEGACY_MAINNET: [&str; 6] = [
        "1BpEi6DfDAUFd7GtittLSdBeYJvcoaVggu",
        "1KXrWXciRDZUpQwQmuM1DbwsKDLYAYsVLR",
        "16w1D5WRVKJuZUsSRzdLp9w3YGcgoxDXb",
        "3CWFddi6m4ndiGyKqzYvsFYagqDLPVMTzC",
        "3LDsS579y7sruadqu11beEJoTjdFiFCdX4",
        "31nwvkZwyPdgzjBJZXfDmSWsC4ZLKpYyUw",
    ];
    const CASHADDR_MAINNET: [&str; 6] = [
        "bitcoincash:qpm2qsznhks23z7629mms6s4cwef74vcwvy22gdx6a",
        "bitcoincash:qr95sy3j9xwd2ap32xkykttr4cvcu7as4y0qverfuy",
        "bitcoincash:qqq3728yw0y47sqn6l2na30mcw6zm78dzqre909m2r",
        "bitcoincash:ppm2qsznhks23z7629mms6s4cwef74vcwvn0h829pq",
        "bitcoincash:pr95sy3j9xwd2ap32xkykttr4cvcu7as4yc93ky28e",
        "bitcoincash:pqq3728yw0y47sqn6l2na30mcw6zm78dzq5ucqzc37",
    ];
    const HASH160_MAINNET: [&str; 6] = [
        "76a04053bda0a88bda5177b86a15c3b29f559873",
        "cb481232299cd5743151ac4b2d63ae198e7bb0a9",
        "011f28e473c95f4013d7d53ec5fbc3b42df8ed10",
        "76a04053bda0a88bda5177b86a15c3b29f559873",
        "cb481232299cd5743151ac4b2d63ae198e7bb0a9",
        "011f28e473c95f4013d7d53ec5fbc3b42df8ed10",
    ];

    fn testnet_legacy_fixtures() -> Vec<String> {
        HASH160_MAINNET[..3]
            .iter()
            .map(|h| hash160_to_legacy(h, TESTNET_P2PKH).unwrap())
            .collect()
    }

    #[test]
    fn legacy_to_cashaddr() {
        for (legacy, cash) in LEGACY_MAINNET.iter().zip(&CASHADDR_MAINNET) {
            assert_eq!(
                to_cash_address(legacy, &CashAddrFormat::default()).unwrap(),
                *cash
            );
        }
    }

    #[test]
    fn cashaddr_to_legacy() {
        for (legacy, cash) in LEGACY_MAINNET.iter().zip(&CASHADDR_MAINNET) {
            assert_eq!(to_legacy_address(cash).unwrap(), *legacy);
        }
    }

    #[test]
    fn conversion_is_idempotent() {
        for legacy in &LEGACY_MAINNET {
            assert_eq!(to_legacy_address(legacy).unwrap(), *legacy);
        }
        for cash in &CASHADDR_MAINNET {
            assert_eq!(
                to_cash_address(cash, &CashAddrFormat::default()).unwrap(),
                *cash
            );
        }
    }

    #[test]
    fn prefixless_equivalence() {
        for cash in &CASHADDR_MAINNET {
            let bare = cash.split(':').nth(1).unwrap();
            assert_eq!(Address::decode(bare).unwrap(), Address::decode(cash).unwrap());
            assert_eq!(
                to_cash_address(bare, &CashAddrFormat::default()).unwrap(),
                *cash
            );
        }
    }

    #[test]
    fn prefix_stripping() {
        for cash in &CASHADDR_MAINNET {
            let format = CashAddrFormat {
                with_prefix: false,
                ..CashAddrFormat::default()
            };
            assert_eq!(
                to_cash_address(cash, &format).unwrap(),
                cash.split(':').nth(1).unwrap()
            );
        }
    }

    #[test]
    fn hash160_conversions() {
        for (legacy, hash160) in LEGACY_MAINNET.iter().zip(&HASH160_MAINNET) {
            assert_eq!(legacy_to_hash160(legacy).unwrap(), *hash160);
        }
        for (cash, hash160) in CASHADDR_MAINNET.iter().zip(&HASH160_MAINNET) {
            assert_eq!(cash_to_hash160(cash).unwrap(), *hash160);
        }
        assert_eq!(
            hash160_to_legacy(HASH160_MAINNET[0], MAINNET_P2PKH).unwrap(),
            LEGACY_MAINNET[0]
        );
        assert_eq!(
            hash160_to_legacy(HASH160_MAINNET[3], MAINNET_P2SH).unwrap(),
            LEGACY_MAINNET[3]
        );
        assert_eq!(
            hash160_to_cash(HASH160_MAINNET[0], MAINNET_P2PKH, false).unwrap(),
            CASHADDR_MAINNET[0]
        );
        assert_eq!(
            hash160_to_cash(HASH160_MAINNET[3], MAINNET_P2SH, false).unwrap(),
            CASHADDR_MAINNET[3]
        );
    }

    #[test]
    fn hash160_conversions_reject_bad_input() {
        assert_eq!(
            legacy_to_hash160(CASHADDR_MAINNET[0]),
            Err(AddressError::UnrecognizedAddress)
        );
        assert_eq!(
            cash_to_hash160(LEGACY_MAINNET[0]),
            Err(AddressError::UnrecognizedAddress)
        );
        assert_eq!(
            hash160_to_legacy("some invalid address", MAINNET_P2PKH),
            Err(AddressError::InvalidCharacter)
        );
        assert_eq!(
            hash160_to_cash("abcd", MAINNET_P2PKH, false),
            Err(AddressError::InvalidLength)
        );
        // 0x42 is not a legacy version byte.
        assert_eq!(
            hash160_to_cash(HASH160_MAINNET[0], 0x42, false),
            Err(AddressError::UnrecognizedAddress)
        );
    }

    #[test]
    fn testnet_round_trip() {
        for (legacy, hash160) in testnet_legacy_fixtures().iter().zip(&HASH160_MAINNET) {
            let address = Address::decode(legacy).unwrap();
            assert_eq!(address.network, Network::Testnet);
            assert_eq!(address.script_type, ScriptType::P2PKH);
            assert_eq!(hex::encode(address.hash160()), *hash160);

            let cash = to_cash_address(legacy, &CashAddrFormat::default()).unwrap();
            assert!(cash.starts_with("bchtest:q"));
            assert_eq!(to_legacy_address(&cash).unwrap(), *legacy);
        }
    }

    #[test]
    fn regtest_round_trip() {
        let format = CashAddrFormat {
            as_regtest: true,
            ..CashAddrFormat::default()
        };
        for legacy in &testnet_legacy_fixtures() {
            let regtest = to_cash_address(legacy, &format).unwrap();
            assert!(regtest.starts_with("bchreg:"));
            assert!(is_regtest_address(&regtest).unwrap());
            // Regtest collapses back to the testnet legacy form.
            assert_eq!(to_legacy_address(&regtest).unwrap(), *legacy);
        }
    }

    #[test]
    fn format_classification() {
        for legacy in &LEGACY_MAINNET {
            assert!(is_legacy_address(legacy).unwrap());
            assert!(!is_cash_address(legacy).unwrap());
            assert_eq!(
                detect_address_format(legacy).unwrap(),
                AddressFormat::Legacy
            );
        }
        for cash in &CASHADDR_MAINNET {
            assert!(!is_legacy_address(cash).unwrap());
            assert!(is_cash_address(cash).unwrap());
            assert_eq!(
                detect_address_format(cash).unwrap(),
                AddressFormat::CashAddr
            );
        }
    }

    #[test]
    fn network_classification() {
        for address in LEGACY_MAINNET.iter().chain(&CASHADDR_MAINNET) {
            assert!(is_mainnet_address(address).unwrap());
            assert!(!is_testnet_address(address).unwrap());
            assert!(!is_regtest_address(address).unwrap());
            assert_eq!(detect_address_network(address).unwrap(), Network::Mainnet);
        }
        for legacy in &testnet_legacy_fixtures() {
            assert!(!is_mainnet_address(legacy).unwrap());
            assert!(is_testnet_address(legacy).unwrap());
            assert!(!is_regtest_address(legacy).unwrap());
            assert_eq!(detect_address_network(legacy).unwrap(), Network::Testnet);
        }
    }

    #[test]
    fn type_classification() {
        for address in LEGACY_MAINNET[..3].iter().chain(&CASHADDR_MAINNET[..3]) {
            assert!(is_p2pkh_address(address).unwrap());
            assert!(!is_p2sh_address(address).unwrap());
            assert_eq!(detect_address_type(address).unwrap(), ScriptType::P2PKH);
        }
        for address in LEGACY_MAINNET[3..].iter().chain(&CASHADDR_MAINNET[3..]) {
            assert!(!is_p2pkh_address(address).unwrap());
            assert!(is_p2sh_address(address).unwrap());
            assert_eq!(detect_address_type(address).unwrap(), ScriptType::P2SH);
        }
    }

    #[test]
    fn hash160_detection() {
        for hash160 in &HASH160_MAINNET {
            assert!(is_hash160(hash160).unwrap());
        }
        for address in LEGACY_MAINNET.iter().chain(&CASHADDR_MAINNET) {
            assert!(!is_hash160(address).unwrap());
        }
        assert_eq!(
            is_hash160("some invalid address"),
            Err(AddressError::UnrecognizedAddress)
        );
    }

    #[test]
    fn invalid_input_fails_everything() {
        for input in &["some invalid address", ""] {
            assert_eq!(
                Address::decode(input),
                Err(AddressError::UnrecognizedAddress)
            );
            assert_eq!(
                to_legacy_address(input),
                Err(AddressError::UnrecognizedAddress)
            );
            assert_eq!(
                to_cash_address(input, &CashAddrFormat::default()),
                Err(AddressError::UnrecognizedAddress)
            );
            assert_eq!(
                is_legacy_address(input),
                Err(AddressError::UnrecognizedAddress)
            );
            assert_eq!(
                detect_address_network(input),
                Err(AddressError::UnrecognizedAddress)
            );
            assert_eq!(
                detect_address_type(input),
                Err(AddressError::UnrecognizedAddress)
            );
        }
    }

    #[test]
    fn corrupted_addresses_never_decode() {
        // Prefixed cashaddr with one flipped symbol.
        assert_eq!(
            Address::decode("bitcoincash:qpm2qsznhks23z7629mms6s4cwef74vcwvy22gdx6q"),
            Err(AddressError::ChecksumMismatch)
        );
        // Legacy with one flipped character.
        assert_eq!(
            Address::decode("1BpEi6DfDAUFd7GtittLSdBeYJvcoaVgguu"),
            Err(AddressError::ChecksumMismatch)
        );
    }

    #[test]
    fn decode_reencode_identity() {
        let input = "bitcoincash:qpdh9s677ya8tnx7zdhfrn8qfyvy22wj4qa7nwqa5v";
        let address = Address::decode(input).unwrap();
        assert_eq!(address.network, Network::Mainnet);
        assert_eq!(address.script_type, ScriptType::P2PKH);
        assert_eq!(address.encode_cash(&CashAddrFormat::default()), input);
    }

    #[test]
    fn from_str_delegates_to_decode() {
        let address: Address = CASHADDR_MAINNET[0].parse().unwrap();
        assert_eq!(address.network, Network::Mainnet);
        assert!("some invalid address".parse::<Address>().is_err());
    }
}
