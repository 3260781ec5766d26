//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{call, deploy, deploy_plan, send, set_address},
    constants::{
        ALCHEMY_KEY_ENV_VAR, DEFAULT_PLAN_PATH, DEPLOYMENTS_PATH_ENV_VAR, ETHERSCAN_KEY_ENV_VAR,
        NETWORK_ENV_VAR, PRIVATE_KEY_ENV_VAR, RPC_URL_ENV_VAR,
    },
    errors::ScriptError,
    types::Network,
};

/// Deploy and configure the Autograph contracts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The network to deploy to
    #[arg(short, long, env = NETWORK_ENV_VAR, value_enum, default_value_t = Network::Amoy)]
    pub network: Network,

    /// Network RPC URL, overrides the URL derived from the network
    #[arg(short, long, env = RPC_URL_ENV_VAR)]
    pub rpc_url: Option<String>,

    /// Alchemy API key used to reach hosted networks
    #[arg(long, env = ALCHEMY_KEY_ENV_VAR, hide_env_values = true)]
    pub alchemy_key: Option<String>,

    /// Private key of the deployer, needed by every command that signs
    #[arg(short, long, env = PRIVATE_KEY_ENV_VAR, hide_env_values = true)]
    pub priv_key: Option<String>,

    /// Block explorer API key used to verify contract sources
    #[arg(long, env = ETHERSCAN_KEY_ENV_VAR, hide_env_values = true)]
    pub etherscan_api_key: Option<String>,

    /// Path to the deployments file, defaults to `deployments.<network>.json`
    #[arg(short, long, env = DEPLOYMENTS_PATH_ENV_VAR)]
    pub deployments: Option<PathBuf>,

    /// The script to run
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// The RPC URL to send requests to
    pub fn resolved_rpc_url(&self) -> Result<String, ScriptError> {
        match &self.rpc_url {
            Some(url) => Ok(url.clone()),
            None => self.network.rpc_url(self.alchemy_key.as_deref()),
        }
    }

    /// The path of the deployments file
    pub fn deployments_path(&self) -> PathBuf {
        self.deployments
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.network.default_deployments_path()))
    }
}

/// The credentials and endpoints shared by every command
pub struct Context {
    /// The network being deployed to
    pub network: Network,
    /// The RPC URL to send requests to
    pub rpc_url: String,
    /// Private key of the deployer
    pub priv_key: Option<String>,
    /// Block explorer API key
    pub etherscan_api_key: Option<String>,
    /// Path to the deployments file
    pub deployments_path: PathBuf,
}

impl TryFrom<&Cli> for Context {
    type Error = ScriptError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        Ok(Self {
            network: cli.network,
            rpc_url: cli.resolved_rpc_url()?,
            priv_key: cli.priv_key.clone(),
            etherscan_api_key: cli.etherscan_api_key.clone(),
            deployments_path: cli.deployments_path(),
        })
    }
}

impl Context {
    /// The private key to sign with, required by every signing command
    pub fn signing_key(&self) -> Result<&str, ScriptError> {
        self.priv_key.as_deref().ok_or_else(|| {
            ScriptError::MissingCredential(format!(
                "{PRIVATE_KEY_ENV_VAR} is required to sign transactions"
            ))
        })
    }
}

/// The deploy and configuration scripts
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Deploy a single contract with `forge create`
    Deploy(DeployArgs),
    /// Deploy every contract in a deploy plan, in order
    DeployPlan(DeployPlanArgs),
    /// Set an address field on a deployed contract
    SetAddress(SetAddressArgs),
    /// Send a state-changing call to a deployed contract
    Send(SendArgs),
    /// Make a read-only call to a deployed contract and print the result
    Call(CallArgs),
}

impl Command {
    /// Run the command against the given context
    pub async fn run(self, ctx: Context) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => deploy(args, &ctx),
            Command::DeployPlan(args) => deploy_plan(args, &ctx),
            Command::SetAddress(args) => set_address(args, &ctx).await,
            Command::Send(args) => send(args, &ctx).await,
            Command::Call(args) => call(args, &ctx).await,
        }
    }
}

/// Deploy a contract, either named directly or taken from a deploy plan
#[derive(Args, Debug)]
pub struct DeployArgs {
    /// The contract identifier, e.g. `src/AutographOpenAction.sol:AutographOpenAction`
    #[arg(short, long, required_unless_present = "from_plan", conflicts_with = "from_plan")]
    pub contract: Option<String>,

    /// Constructor arguments; `$Name` resolves to a recorded deployment
    #[arg(long, num_args = 1.., conflicts_with = "from_plan")]
    pub constructor_args: Vec<String>,

    /// Deploy the plan entry with this name
    #[arg(long)]
    pub from_plan: Option<String>,

    /// Path to the deploy plan
    #[arg(long, default_value = DEFAULT_PLAN_PATH)]
    pub plan: PathBuf,

    /// The key under which to record the deployed address, defaults to the contract name
    #[arg(long)]
    pub name: Option<String>,

    /// Skip source verification on the block explorer
    #[arg(long)]
    pub no_verify: bool,

    /// Print the command instead of running it
    #[arg(long)]
    pub dry_run: bool,

    /// The forge project root
    #[arg(long)]
    pub root: Option<PathBuf>,
}

/// Deploy every contract in a plan
#[derive(Args, Debug)]
pub struct DeployPlanArgs {
    /// Path to the deploy plan
    #[arg(long, default_value = DEFAULT_PLAN_PATH)]
    pub plan: PathBuf,

    /// Skip source verification on the block explorer
    #[arg(long)]
    pub no_verify: bool,

    /// Print the commands instead of running them
    #[arg(long)]
    pub dry_run: bool,

    /// The forge project root
    #[arg(long)]
    pub root: Option<PathBuf>,
}

/// The contract targeted by a call, shared by the call commands
#[derive(Args, Debug)]
pub struct ContractTarget {
    /// The contract address, or `$Name` for a recorded deployment
    #[arg(short, long)]
    pub contract: String,

    /// Path to the contract ABI, either a bare ABI array or a Foundry artifact
    #[arg(short, long)]
    pub abi: PathBuf,

    /// The name of the function to call
    #[arg(short, long)]
    pub function: String,
}

/// Set an address field on a deployed contract
#[derive(Args, Debug)]
pub struct SetAddressArgs {
    /// The contract and setter to call
    #[command(flatten)]
    pub target: ContractTarget,

    /// The address to set, or `$Name` for a recorded deployment.
    /// Prompted for if not given
    #[arg(long)]
    pub address: Option<String>,
}

/// Send a state-changing call to a deployed contract
#[derive(Args, Debug)]
pub struct SendArgs {
    /// The contract and function to call
    #[command(flatten)]
    pub target: ContractTarget,

    /// The function arguments; `$Name` resolves to a recorded deployment
    #[arg(long, num_args = 0..)]
    pub args: Vec<String>,
}

/// Make a read-only call to a deployed contract
#[derive(Args, Debug)]
pub struct CallArgs {
    /// The contract and function to call
    #[command(flatten)]
    pub target: ContractTarget,

    /// The function arguments; `$Name` resolves to a recorded deployment
    #[arg(long, num_args = 0..)]
    pub args: Vec<String>,
}
