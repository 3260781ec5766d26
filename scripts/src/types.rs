//! Type definitions used throughout the scripts

use std::fmt::{self, Display};

use clap::ValueEnum;

use crate::{
    constants::{
        ALCHEMY_KEY_ENV_VAR, ALCHEMY_URL_TEMPLATE, AMOY_ALCHEMY_SUBDOMAIN, AMOY_CHAIN_ID,
        DEVNET_CHAIN_ID, DEVNET_RPC_URL, POLYGON_ALCHEMY_SUBDOMAIN, POLYGON_CHAIN_ID,
    },
    errors::ScriptError,
};

/// The networks the contracts can be deployed to
#[derive(ValueEnum, Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Network {
    /// The Polygon Amoy testnet
    #[default]
    Amoy,
    /// Polygon mainnet
    Polygon,
    /// A local Anvil devnet
    Devnet,
}

impl Network {
    /// The chain ID of the network
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Amoy => AMOY_CHAIN_ID,
            Network::Polygon => POLYGON_CHAIN_ID,
            Network::Devnet => DEVNET_CHAIN_ID,
        }
    }

    /// The Alchemy subdomain serving the network, if it is a hosted network
    fn alchemy_subdomain(&self) -> Option<&'static str> {
        match self {
            Network::Amoy => Some(AMOY_ALCHEMY_SUBDOMAIN),
            Network::Polygon => Some(POLYGON_ALCHEMY_SUBDOMAIN),
            Network::Devnet => None,
        }
    }

    /// The RPC URL for the network
    ///
    /// Hosted networks are reached through Alchemy and require an API key
    pub fn rpc_url(&self, api_key: Option<&str>) -> Result<String, ScriptError> {
        let Some(subdomain) = self.alchemy_subdomain() else {
            return Ok(DEVNET_RPC_URL.to_string());
        };

        let key = api_key.ok_or_else(|| {
            ScriptError::MissingCredential(format!(
                "{ALCHEMY_KEY_ENV_VAR} is required to reach {self}"
            ))
        })?;

        Ok(ALCHEMY_URL_TEMPLATE
            .replace("{subdomain}", subdomain)
            .replace("{key}", key))
    }

    /// The default path of the deployments file for the network
    pub fn default_deployments_path(&self) -> String {
        format!("deployments.{self}.json")
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Amoy => write!(f, "amoy"),
            Network::Polygon => write!(f, "polygon"),
            Network::Devnet => write!(f, "devnet"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Network;
    use crate::errors::ScriptError;

    #[test]
    fn test_amoy_url() {
        let url = Network::Amoy.rpc_url(Some("abc123")).unwrap();
        assert_eq!(url, "https://polygon-amoy.g.alchemy.com/v2/abc123");
        assert_eq!(Network::Amoy.chain_id(), 80002);
    }

    #[test]
    fn test_hosted_network_requires_key() {
        let res = Network::Polygon.rpc_url(None);
        assert!(matches!(res, Err(ScriptError::MissingCredential(_))));
    }

    #[test]
    fn test_devnet_needs_no_key() {
        let url = Network::Devnet.rpc_url(None).unwrap();
        assert_eq!(url, "http://127.0.0.1:8545");
        assert_eq!(
            Network::Devnet.default_deployments_path(),
            "deployments.devnet.json"
        );
    }
}
