use bitcoin_hashes::sha256d::Hash as Sha256d;
use bitcoin_hashes::Hash;
use rust_base58::base58::{FromBase58, ToBase58};

use crate::address::errors::AddressError;

/// Legacy base58check codec: version byte + hash160 + 4-byte sha256d
/// checksum, mapped through the 58-character bitcoin alphabet.
pub struct Base58Codec;

impl Base58Codec {
    pub fn encode(version_byte: u8, hash160: &[u8; 20]) -> String {
        let mut body = Vec::with_capacity(25);
        body.push(version_byte);
        body.extend_from_slice(hash160);

        let checksum = Sha256d::hash(&body);
        body.extend_from_slice(&checksum[0..4]);
        body.to_base58()
    }

    pub fn decode(input: &str) -> Result<(u8, [u8; 20]), AddressError> {
        let raw = input
            .from_base58()
            .map_err(|_| AddressError::InvalidCharacter)?;
        if raw.len() < 5 {
            return Err(AddressError::InvalidLength);
        }

        let (payload, checksum) = raw.split_at(raw.len() - 4);
        let expected = Sha256d::hash(payload);
        if checksum != &expected[0..4] {
            return Err(AddressError::ChecksumMismatch);
        }

        // Version byte plus a 20-byte hash160, nothing else.
        if payload.len() != 21 {
            return Err(AddressError::InvalidLength);
        }
        let mut hash160 = [0; 20];
        hash160.copy_from_slice(&payload[1..]);
        Ok((payload[0], hash160))
    }
}
