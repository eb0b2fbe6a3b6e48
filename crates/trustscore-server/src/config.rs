use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use trustscore_core::{Chain, WalletAddress};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub chain: ChainConfig,
    pub registry: RegistryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChainConfig {
    pub id: u64,
    pub rpc_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RegistryConfig {
    /// TrustRegistry address. The zero address means "not deployed yet".
    pub address: WalletAddress,
    /// Owner signing key. Writes are disabled without one.
    #[serde(default)]
    pub owner_private_key: Option<String>,
    /// Confirmations to wait before a write counts as confirmed
    pub confirmations: u64,
}

impl RegistryConfig {
    pub fn is_deployed(&self) -> bool {
        !self.address.is_zero()
    }

    pub fn owner_key(&self) -> Option<&str> {
        self.owner_private_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("chain.id", 137)?
            .set_default("chain.rpc_url", "https://polygon-rpc.com")?
            .set_default("registry.address", "0x0000000000000000000000000000000000000000")?
            .set_default("registry.confirmations", 1)?
            // Load from config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (TRUSTSCORE__REGISTRY__ADDRESS, etc.)
            .add_source(
                Environment::with_prefix("TRUSTSCORE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn chain(&self) -> Result<Chain, ConfigError> {
        Chain::from_id(self.chain.id).map_err(|e| ConfigError::Message(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(address: WalletAddress, key: Option<&str>) -> RegistryConfig {
        RegistryConfig {
            address,
            owner_private_key: key.map(str::to_string),
            confirmations: 1,
        }
    }

    #[test]
    fn test_zero_address_is_not_deployed() {
        assert!(!registry(WalletAddress::ZERO, None).is_deployed());

        let address =
            WalletAddress::parse("0x1111111111111111111111111111111111111111").unwrap();
        assert!(registry(address, None).is_deployed());
    }

    #[test]
    fn test_blank_owner_key_disables_writes() {
        assert_eq!(registry(WalletAddress::ZERO, None).owner_key(), None);
        assert_eq!(registry(WalletAddress::ZERO, Some("  ")).owner_key(), None);
        assert_eq!(registry(WalletAddress::ZERO, Some("0xabc")).owner_key(), Some("0xabc"));
    }

    #[test]
    fn test_unknown_chain_is_a_config_error() {
        let config = AppConfig {
            server: ServerConfig { host: "127.0.0.1".into(), port: 3000 },
            chain: ChainConfig { id: 999, rpc_url: "http://localhost:8545".into() },
            registry: registry(WalletAddress::ZERO, None),
        };
        assert!(config.chain().is_err());
        assert_eq!(config.server_addr(), "127.0.0.1:3000");
    }
}
