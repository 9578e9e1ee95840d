use log::debug;

use crate::address::errors::AddressError;
use crate::network::{Network, PREFIX_TRIAL_ORDER};

/// The 32-character cashaddr alphabet.
const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Generators of the BCH code behind the 40-bit polymod checksum.
const GENERATORS: [u64; 5] = [
    0x98f2bc8e61,
    0x79b76d99e2,
    0xf33e5fb3c4,
    0xae2eabe2a8,
    0x1e4f43e470,
];

/// Version byte layout: bit 3 selects the script type, the low three bits
/// encode the hash size. Only 20-byte hashes are supported here, so the
/// size bits must be zero.
pub const VERSION_P2PKH: u8 = 0x00;
pub const VERSION_P2SH: u8 = 0x08;
const TYPE_MASK: u8 = 0x78;
const SIZE_MASK: u8 = 0x07;

/// Cashaddr codec: human-readable network prefix, 5-bit grouped payload
/// and an 8-symbol polymod checksum.
pub struct CashAddrCodec;

impl CashAddrCodec {
    pub fn encode(
        prefix: &str,
        version_byte: u8,
        hash160: &[u8],
    ) -> Result<String, AddressError> {
        if hash160.len() != 20 {
            return Err(AddressError::InvalidLength);
        }
        let mut hash = [0; 20];
        hash.copy_from_slice(hash160);
        Ok(Self::encode_hash(prefix, version_byte, &hash))
    }

    /// Infallible encoding for a hash that is already exactly 20 bytes.
    pub(crate) fn encode_hash(prefix: &str, version_byte: u8, hash160: &[u8; 20]) -> String {
        let mut payload = Vec::with_capacity(21);
        payload.push(version_byte);
        payload.extend_from_slice(hash160);
        let payload = bytes_to_fives(&payload);

        // The checksum covers the prefix expansion, a zero separator, the
        // payload and eight zero placeholder symbols.
        let mut symbols = expand_prefix(prefix);
        symbols.extend_from_slice(&payload);
        symbols.extend_from_slice(&[0; 8]);
        let checksum = polymod(&symbols);

        let mut out = String::with_capacity(prefix.len() + 1 + payload.len() + 8);
        out.push_str(prefix);
        out.push(':');
        for &group in &payload {
            out.push(CHARSET[group as usize] as char);
        }
        for shift in (0..8).rev() {
            let group = (checksum >> (shift * 5)) & 0x1f;
            out.push(CHARSET[group as usize] as char);
        }
        out
    }

    /// Decodes `prefix:payload` or a bare payload. A bare payload is tried
    /// against the known prefixes in `PREFIX_TRIAL_ORDER`; the first
    /// checksum success decides the network.
    pub fn decode(input: &str) -> Result<(Network, u8, [u8; 20]), AddressError> {
        let input = normalize_case(input)?;

        if let Some(split) = input.find(':') {
            let prefix = &input[..split];
            let payload = &input[split + 1..];
            if payload.contains(':') {
                return Err(AddressError::UnrecognizedAddress);
            }
            let network = Network::from_cashaddr_prefix(prefix)
                .ok_or(AddressError::UnrecognizedAddress)?;
            let (version_byte, hash160) = Self::decode_payload(prefix, payload)?;
            return Ok((network, version_byte, hash160));
        }

        for network in &PREFIX_TRIAL_ORDER {
            match Self::decode_payload(network.cashaddr_prefix(), &input) {
                Ok((version_byte, hash160)) => {
                    debug!("bare cashaddr payload resolved to {}", network);
                    return Ok((*network, version_byte, hash160));
                }
                // A checksum failure just means this prefix was not the
                // one the address was built with; anything else is final.
                Err(AddressError::ChecksumMismatch) => continue,
                Err(err) => return Err(err),
            }
        }
        Err(AddressError::ChecksumMismatch)
    }

    fn decode_payload(prefix: &str, payload: &str) -> Result<(u8, [u8; 20]), AddressError> {
        let mut symbols = expand_prefix(prefix);
        let separator = symbols.len();
        for c in payload.chars() {
            let group = CHARSET
                .iter()
                .position(|&b| b as char == c)
                .ok_or(AddressError::InvalidCharacter)?;
            symbols.push(group as u8);
        }

        // Version byte needs two symbols, the checksum eight more.
        if payload.len() < 10 {
            return Err(AddressError::InvalidLength);
        }
        if polymod(&symbols) != 0 {
            return Err(AddressError::ChecksumMismatch);
        }

        let bytes = fives_to_bytes(&symbols[separator..symbols.len() - 8])?;
        let version_byte = bytes[0];
        let hash = &bytes[1..];

        if version_byte & SIZE_MASK != 0 {
            return Err(AddressError::UnsupportedHashSize);
        }
        if hash.len() != 20 {
            return Err(AddressError::InvalidLength);
        }
        match version_byte & TYPE_MASK {
            VERSION_P2PKH | VERSION_P2SH => {}
            _ => return Err(AddressError::UnrecognizedAddress),
        }

        let mut hash160 = [0; 20];
        hash160.copy_from_slice(hash);
        Ok((version_byte, hash160))
    }
}

/// The checksum prefix expansion keeps only the low five bits of each
/// prefix character, followed by a zero separator symbol.
fn expand_prefix(prefix: &str) -> Vec<u8> {
    let mut symbols: Vec<u8> = prefix.bytes().map(|b| b & 0x1f).collect();
    symbols.push(0);
    symbols
}

/// Cashaddr addresses are case-insensitive but may not mix cases.
fn normalize_case(input: &str) -> Result<String, AddressError> {
    let has_lower = input.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = input.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(AddressError::InvalidCharacter);
    }
    Ok(input.to_ascii_lowercase())
}

/// Regroups 8-bit bytes into 5-bit symbols, zero-padding the final group.
fn bytes_to_fives(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity((data.len() * 8 + 4) / 5);
    let mut acc: u32 = 0;
    let mut bits = 0;
    for &byte in data {
        acc = (acc << 8) | u32::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(((acc >> bits) & 0x1f) as u8);
        }
    }
    if bits > 0 {
        out.push(((acc << (5 - bits)) & 0x1f) as u8);
    }
    out
}

/// Regroups 5-bit symbols back into bytes. The symbols must describe a
/// whole number of bytes and any padding bits must be zero.
fn fives_to_bytes(data: &[u8]) -> Result<Vec<u8>, AddressError> {
    let mut out = Vec::with_capacity(data.len() * 5 / 8);
    let mut acc: u32 = 0;
    let mut bits = 0;
    for &group in data {
        acc = (acc << 5) | u32::from(group);
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push(((acc >> bits) & 0xff) as u8);
        }
    }
    if bits >= 5 || acc & ((1 << bits) - 1) != 0 {
        return Err(AddressError::InvalidLength);
    }
    Ok(out)
}

/// The 40-bit BCH checksum over 5-bit symbols, per the cashaddr spec.
fn polymod(symbols: &[u8]) -> u64 {
    let mut checksum: u64 = 1;
    for &symbol in symbols {
        let top = (checksum >> 35) as u8;
        checksum = ((checksum & 0x07_ffff_ffff) << 5) ^ u64::from(symbol);
        for (bit, generator) in GENERATORS.iter().enumerate() {
            if top >> bit & 1 == 1 {
                checksum ^= generator;
            }
        }
    }
    checksum ^ 1
}
