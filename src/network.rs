use std::fmt;

/// Legacy version byte for a mainnet pay-to-pubkey-hash address.
pub const MAINNET_P2PKH: u8 = 0x00;
/// Legacy version byte for a mainnet pay-to-script-hash address.
pub const MAINNET_P2SH: u8 = 0x05;
/// Legacy version byte for a testnet or regtest pay-to-pubkey-hash address.
pub const TESTNET_P2PKH: u8 = 0x6f;
/// Legacy version byte for a testnet or regtest pay-to-script-hash address.
pub const TESTNET_P2SH: u8 = 0xc4;

/// Networks a prefixless cashaddr payload is tried against, in order.
/// The first prefix whose checksum verifies wins, so this ordering is
/// part of the decoding contract and must not be reordered.
pub const PREFIX_TRIAL_ORDER: [Network; 3] =
    [Network::Mainnet, Network::Testnet, Network::Regtest];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Mainnet,
    Testnet,
    Regtest,
}

impl Network {
    /// The human-readable prefix used by the cashaddr encoding.
    pub fn cashaddr_prefix(self) -> &'static str {
        match self {
            Network::Mainnet => "bitcoincash",
            Network::Testnet => "bchtest",
            Network::Regtest => "bchreg",
        }
    }

    /// Resolves a cashaddr prefix back to its network.
    pub fn from_cashaddr_prefix(prefix: &str) -> Option<Network> {
        match prefix {
            "bitcoincash" => Some(Network::Mainnet),
            "bchtest" => Some(Network::Testnet),
            "bchreg" => Some(Network::Regtest),
            _ => None,
        }
    }

    /// Legacy pubkey-hash version byte. Testnet and regtest share a byte,
    /// so a legacy address alone can never prove it is regtest.
    pub fn legacy_p2pkh_version(self) -> u8 {
        match self {
            Network::Mainnet => MAINNET_P2PKH,
            Network::Testnet | Network::Regtest => TESTNET_P2PKH,
        }
    }

    /// Legacy script-hash version byte.
    pub fn legacy_p2sh_version(self) -> u8 {
        match self {
            Network::Mainnet => MAINNET_P2SH,
            Network::Testnet | Network::Regtest => TESTNET_P2SH,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let printable = match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Regtest => "regtest",
        };
        write!(f, "{}", printable)
    }
}
