//! Tool configuration.
//!
//! Each setting is layered as command-line flag > environment variable >
//! built-in default. The environment layer is read once into [`EnvLayer`]
//! so resolution itself is a pure function of its inputs.
//!
//! Offline commands only need the decoder file; [`load_decoder_registry`]
//! resolves that alone and never reads the network settings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use move_txn_core::registry::DecoderRegistry;
use move_txn_transport::network::{infer_network_from_url, resolve_node_url, Network};
use move_txn_transport::rest::RestClient;
use move_txn_types::env_utils::{env_path, env_string, env_var};

pub const ENV_HOME: &str = "MOVE_TXN_HOME";
pub const ENV_NODE_URL: &str = "MOVE_TXN_NODE_URL";
pub const ENV_NETWORK: &str = "MOVE_TXN_NETWORK";
pub const ENV_TIMEOUT_SECS: &str = "MOVE_TXN_TIMEOUT_SECS";
pub const ENV_POLL_INTERVAL_MS: &str = "MOVE_TXN_POLL_INTERVAL_MS";
pub const ENV_DECODERS: &str = "MOVE_TXN_DECODERS";

const DECODER_FILE_NAME: &str = "decoders.json";

/// Base directory for tool files: `$MOVE_TXN_HOME`, else `~/.move-txn`.
pub fn tool_home() -> PathBuf {
    env_path(ENV_HOME, dirs::home_dir().as_deref()).unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".move-txn")
    })
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct FlagLayer {
    pub node_url: Option<String>,
    pub network: Option<String>,
    pub timeout_secs: Option<u64>,
    pub decoders: Option<PathBuf>,
}

/// Values read from the environment.
#[derive(Debug, Clone, Default)]
pub struct EnvLayer {
    pub node_url: Option<String>,
    pub network: Option<String>,
    pub timeout_secs: Option<u64>,
    pub poll_interval_ms: Option<u64>,
    pub decoders: Option<PathBuf>,
}

impl EnvLayer {
    pub fn from_env() -> Self {
        Self {
            node_url: env_string(ENV_NODE_URL),
            network: env_string(ENV_NETWORK),
            timeout_secs: env_var(ENV_TIMEOUT_SECS),
            poll_interval_ms: env_var(ENV_POLL_INTERVAL_MS),
            decoders: env_path(ENV_DECODERS, dirs::home_dir().as_deref()),
        }
    }
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    pub node_url: String,
    /// Named network, explicit or inferred from the node URL.
    pub network: Option<Network>,
    /// Per-round-trip bound; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    pub poll_interval: Duration,
    /// Decoder file to merge over the defaults, if any.
    pub decoders: Option<PathBuf>,
}

impl ToolConfig {
    /// Resolve from flags and the process environment.
    pub fn load(flags: &FlagLayer) -> Result<Self> {
        Self::resolve(flags, &EnvLayer::from_env(), &tool_home())
    }

    /// `home` is where the default decoder file is looked up.
    pub fn resolve(flags: &FlagLayer, env: &EnvLayer, home: &Path) -> Result<Self> {
        let network = flags
            .network
            .as_deref()
            .or(env.network.as_deref())
            .map(str::parse::<Network>)
            .transpose()
            .context("Invalid network")?;

        let explicit_url = flags.node_url.as_deref().or(env.node_url.as_deref());
        let node_url = resolve_node_url(explicit_url, network);
        let network = network.or_else(|| infer_network_from_url(&node_url));

        let timeout = flags
            .timeout_secs
            .or(env.timeout_secs)
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs);

        let poll_interval = env
            .poll_interval_ms
            .filter(|&ms| ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(RestClient::DEFAULT_POLL_INTERVAL);

        let decoders = Self::decoder_path(flags, env, home);

        let config = Self {
            node_url,
            network,
            timeout,
            poll_interval,
            decoders,
        };
        debug!(?config, "resolved configuration");
        Ok(config)
    }

    /// Decoder file: flag, then env, then `<home>/decoders.json` if it exists.
    pub fn decoder_path(flags: &FlagLayer, env: &EnvLayer, home: &Path) -> Option<PathBuf> {
        let default_decoders = home.join(DECODER_FILE_NAME);
        flags
            .decoders
            .clone()
            .or_else(|| env.decoders.clone())
            .or_else(|| default_decoders.is_file().then_some(default_decoders))
    }

    /// Default registry, extended with the configured decoder file.
    pub fn decoder_registry(&self) -> Result<DecoderRegistry> {
        registry_with_file(self.decoders.as_deref())
    }

    pub fn rest_client(&self) -> RestClient {
        RestClient::new(&self.node_url).with_poll_interval(self.poll_interval)
    }
}

/// Registry for offline use: only the decoder file is resolved.
pub fn load_decoder_registry(flags: &FlagLayer) -> Result<DecoderRegistry> {
    let path = ToolConfig::decoder_path(flags, &EnvLayer::from_env(), &tool_home());
    registry_with_file(path.as_deref())
}

fn registry_with_file(path: Option<&Path>) -> Result<DecoderRegistry> {
    let mut registry = DecoderRegistry::with_defaults();
    if let Some(path) = path {
        let added = registry.extend_from_file(path)?;
        debug!(path = %path.display(), added, "loaded decoder file");
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let home = TempDir::new().unwrap();
        let config =
            ToolConfig::resolve(&FlagLayer::default(), &EnvLayer::default(), home.path()).unwrap();
        assert_eq!(config.node_url, Network::Mainnet.fullnode_url());
        assert_eq!(config.network, Some(Network::Mainnet));
        assert_eq!(config.timeout, None);
        assert_eq!(config.poll_interval, RestClient::DEFAULT_POLL_INTERVAL);
        assert_eq!(config.decoders, None);
    }

    #[test]
    fn test_flag_beats_env() {
        let home = TempDir::new().unwrap();
        let flags = FlagLayer {
            network: Some("testnet".to_string()),
            timeout_secs: Some(5),
            ..Default::default()
        };
        let env = EnvLayer {
            network: Some("devnet".to_string()),
            timeout_secs: Some(60),
            poll_interval_ms: Some(50),
            ..Default::default()
        };
        let config = ToolConfig::resolve(&flags, &env, home.path()).unwrap();
        assert_eq!(config.network, Some(Network::Testnet));
        assert_eq!(config.node_url, Network::Testnet.fullnode_url());
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.poll_interval, Duration::from_millis(50));
    }

    #[test]
    fn test_explicit_url_beats_network_preset() {
        let home = TempDir::new().unwrap();
        let flags = FlagLayer {
            node_url: Some("http://127.0.0.1:8080/v1".to_string()),
            ..Default::default()
        };
        let env = EnvLayer {
            network: Some("testnet".to_string()),
            ..Default::default()
        };
        let config = ToolConfig::resolve(&flags, &env, home.path()).unwrap();
        assert_eq!(config.node_url, "http://127.0.0.1:8080/v1");
        assert_eq!(config.network, Some(Network::Testnet));
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let home = TempDir::new().unwrap();
        let env = EnvLayer {
            timeout_secs: Some(0),
            ..Default::default()
        };
        let config = ToolConfig::resolve(&FlagLayer::default(), &env, home.path()).unwrap();
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_unknown_network_rejected() {
        let home = TempDir::new().unwrap();
        let flags = FlagLayer {
            network: Some("moonnet".to_string()),
            ..Default::default()
        };
        let err = ToolConfig::resolve(&flags, &EnvLayer::default(), home.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("moonnet"));
    }

    #[test]
    fn test_default_decoder_file_only_when_present() {
        let home = TempDir::new().unwrap();
        let config =
            ToolConfig::resolve(&FlagLayer::default(), &EnvLayer::default(), home.path()).unwrap();
        assert!(config.decoders.is_none());

        let path = home.path().join("decoders.json");
        std::fs::write(&path, r#"{"functions":{"mint":["address","u64"]}}"#).unwrap();
        let config =
            ToolConfig::resolve(&FlagLayer::default(), &EnvLayer::default(), home.path()).unwrap();
        assert_eq!(config.decoders.as_deref(), Some(path.as_path()));

        let registry = config.decoder_registry().unwrap();
        assert!(registry.lookup("mint").is_some());
        assert!(registry.lookup("upgradePackage").is_some());
    }

    #[test]
    fn test_decoder_path_ignores_network_settings() {
        let home = TempDir::new().unwrap();
        let env = EnvLayer {
            network: Some("aptos-testnet".to_string()),
            decoders: Some(PathBuf::from("/etc/move-txn/decoders.json")),
            ..Default::default()
        };
        assert!(ToolConfig::resolve(&FlagLayer::default(), &env, home.path()).is_err());
        assert_eq!(
            ToolConfig::decoder_path(&FlagLayer::default(), &env, home.path()),
            Some(PathBuf::from("/etc/move-txn/decoders.json"))
        );

        let flags = FlagLayer {
            decoders: Some(PathBuf::from("mine.json")),
            ..Default::default()
        };
        assert_eq!(
            ToolConfig::decoder_path(&flags, &env, home.path()),
            Some(PathBuf::from("mine.json"))
        );
    }
}
