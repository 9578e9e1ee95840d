use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressError {
    /// A character outside the codec's alphabet.
    InvalidCharacter,
    /// Structurally valid input whose checksum does not verify.
    ChecksumMismatch,
    /// Decoded payload is not the expected byte count.
    InvalidLength,
    /// The cashaddr version byte encodes a hash size other than 20 bytes.
    UnsupportedHashSize,
    /// Input matches neither the cashaddr nor the base58check codec.
    UnrecognizedAddress,
    InvalidDerivationPath,
    InvalidExtendedKey,
    UnrecognizedScript,
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let printable = match self {
            AddressError::InvalidCharacter => "invalid character",
            AddressError::ChecksumMismatch => "checksum mismatch",
            AddressError::InvalidLength => "invalid payload length",
            AddressError::UnsupportedHashSize => "unsupported hash size",
            AddressError::UnrecognizedAddress => "unrecognized address",
            AddressError::InvalidDerivationPath => "invalid derivation path",
            AddressError::InvalidExtendedKey => "invalid extended key",
            AddressError::UnrecognizedScript => "unrecognized script",
        };
        write!(f, "{}", printable)
    }
}

impl Error for AddressError {}
