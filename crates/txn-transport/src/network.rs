use std::fmt;
use std::str::FromStr;

const MAINNET_FULLNODE: &str = "https://fullnode.mainnet.aptoslabs.com/v1";
const TESTNET_FULLNODE: &str = "https://fullnode.testnet.aptoslabs.com/v1";
const DEVNET_FULLNODE: &str = "https://fullnode.devnet.aptoslabs.com/v1";
const LOCAL_FULLNODE: &str = "http://127.0.0.1:8080/v1";

/// Named network with a well-known public fullnode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
    Local,
}

impl Network {
    pub fn fullnode_url(self) -> &'static str {
        match self {
            Network::Mainnet => MAINNET_FULLNODE,
            Network::Testnet => TESTNET_FULLNODE,
            Network::Devnet => DEVNET_FULLNODE,
            Network::Local => LOCAL_FULLNODE,
        }
    }

    /// Chain id carried in envelopes for this network. Devnet resets
    /// periodically and has no fixed id.
    pub fn chain_id(self) -> Option<u8> {
        match self {
            Network::Mainnet => Some(1),
            Network::Testnet => Some(2),
            Network::Devnet => None,
            Network::Local => Some(4),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Local => "local",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            "local" | "localnet" => Ok(Network::Local),
            other => Err(anyhow::anyhow!(
                "unknown network '{}' (expected mainnet, testnet, devnet or local)",
                other
            )),
        }
    }
}

pub fn infer_network_from_url(url: &str) -> Option<Network> {
    let lower = url.to_lowercase();
    if lower.contains("testnet") {
        Some(Network::Testnet)
    } else if lower.contains("devnet") {
        Some(Network::Devnet)
    } else if lower.contains("mainnet") {
        Some(Network::Mainnet)
    } else if lower.contains("127.0.0.1") || lower.contains("localhost") {
        Some(Network::Local)
    } else {
        None
    }
}

/// Explicit node URL wins, then the network preset, then mainnet.
pub fn resolve_node_url(node_url: Option<&str>, network: Option<Network>) -> String {
    if let Some(url) = node_url.map(str::trim).filter(|u| !u.is_empty()) {
        return url.trim_end_matches('/').to_string();
    }
    network.unwrap_or(Network::Mainnet).fullnode_url().to_string()
}
