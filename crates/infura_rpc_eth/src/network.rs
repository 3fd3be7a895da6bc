use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The networks the Infura gateway exposes to this client.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Network {
    /// Ethereum mainnet.
    #[default]
    #[serde(rename = "mainnet")]
    Mainnet,
    /// The Ropsten proof-of-work testnet.
    #[serde(rename = "ropsten")]
    Ropsten,
    /// The Kovan proof-of-authority testnet.
    #[serde(rename = "kovan")]
    Kovan,
    /// The Rinkeby proof-of-authority testnet.
    #[serde(rename = "rinkeby")]
    Rinkeby,
    /// Polygon mainnet.
    #[serde(rename = "polygon-mainnet")]
    PolygonMainnet,
    /// Arbitrum One mainnet.
    #[serde(rename = "arbitrum-mainnet")]
    ArbitrumMainnet,
}

impl Network {
    /// Every supported network, in the order used for error messages.
    pub const ALL: [Network; 6] = [
        Network::Mainnet,
        Network::Ropsten,
        Network::Kovan,
        Network::Rinkeby,
        Network::PolygonMainnet,
        Network::ArbitrumMainnet,
    ];

    /// Returns the name used as the subdomain of the gateway endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Ropsten => "ropsten",
            Network::Kovan => "kovan",
            Network::Rinkeby => "rinkeby",
            Network::PolygonMainnet => "polygon-mainnet",
            Network::ArbitrumMainnet => "arbitrum-mainnet",
        }
    }

    /// Builds the gateway endpoint URL for `project_id`.
    pub fn endpoint_url(self, project_id: &str) -> String {
        format!(
            "https://{network}.infura.io/v3/{project_id}",
            network = self.as_str()
        )
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The network name is not a member of the supported set.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid network '{name}'; expected one of: mainnet, ropsten, kovan, rinkeby, polygon-mainnet, arbitrum-mainnet")]
pub struct InvalidNetworkError {
    /// The rejected network name.
    pub name: String,
}

impl FromStr for Network {
    type Err = InvalidNetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Network::ALL
            .into_iter()
            .find(|network| network.as_str() == s)
            .ok_or_else(|| InvalidNetworkError {
                name: s.to_string(),
            })
    }
}
