//! Constants used in the deploy scripts

// ---------------
// | Environment |
// ---------------

/// The environment variable holding the Alchemy API key
pub const ALCHEMY_KEY_ENV_VAR: &str = "ALCHEMY_AMOY_KEY";

/// The environment variable holding the deployer's private key
pub const PRIVATE_KEY_ENV_VAR: &str = "PRIVATE_KEY";

/// The environment variable holding the block explorer API key
pub const ETHERSCAN_KEY_ENV_VAR: &str = "ETHERSCAN_API_KEY";

/// The environment variable overriding the network RPC URL
pub const RPC_URL_ENV_VAR: &str = "RPC_URL";

/// The environment variable selecting the target network
pub const NETWORK_ENV_VAR: &str = "NETWORK";

/// The environment variable overriding the deployments file path
pub const DEPLOYMENTS_PATH_ENV_VAR: &str = "DEPLOYMENTS_PATH";

// ------------
// | Networks |
// ------------

/// The Alchemy RPC URL template, `{subdomain}` and `{key}` are substituted
pub const ALCHEMY_URL_TEMPLATE: &str = "https://{subdomain}.g.alchemy.com/v2/{key}";

/// The Alchemy subdomain for the Polygon Amoy testnet
pub const AMOY_ALCHEMY_SUBDOMAIN: &str = "polygon-amoy";

/// The Alchemy subdomain for Polygon mainnet
pub const POLYGON_ALCHEMY_SUBDOMAIN: &str = "polygon-mainnet";

/// The chain ID of the Polygon Amoy testnet
pub const AMOY_CHAIN_ID: u64 = 80002;

/// The chain ID of Polygon mainnet
pub const POLYGON_CHAIN_ID: u64 = 137;

/// The chain ID of a local Anvil devnet
pub const DEVNET_CHAIN_ID: u64 = 31337;

/// The default hostport that a local Anvil devnet runs on
pub const DEVNET_RPC_URL: &str = "http://127.0.0.1:8545";

// ---------
// | Forge |
// ---------

/// The name of the forge command
pub const FORGE_COMMAND: &str = "forge";

/// The forge subcommand that compiles and deploys a single contract
pub const CREATE_COMMAND: &str = "create";

/// Marker printed by `forge create` before the deployer address
pub const DEPLOYER_MARKER: &str = "Deployer:";

/// Marker printed by `forge create` before the deployed contract address
pub const DEPLOYED_TO_MARKER: &str = "Deployed to:";

/// Marker printed by `forge create` before the deployment transaction hash
pub const TX_HASH_MARKER: &str = "Transaction hash:";

/// Placeholder printed in place of secrets
pub const REDACTED: &str = "<redacted>";

// ---------------
// | Deployments |
// ---------------

/// The deployments key in the deployments file
pub const DEPLOYMENTS_KEY: &str = "deployments";

/// The prefix marking a plan argument as a reference to a deployed contract
pub const DEPLOYMENT_REF_PREFIX: char = '$';

/// The default path of the deploy plan
pub const DEFAULT_PLAN_PATH: &str = "deploy-plan.json";

/// The key under which Foundry artifacts nest the contract ABI
pub const ARTIFACT_ABI_KEY: &str = "abi";

/// The number of spaces used when pretty-printing JSON files
pub const JSON_INDENT: usize = 4;
