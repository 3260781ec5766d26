//! Construction and execution of `forge create` invocations

use std::{path::PathBuf, process::Command, str::FromStr};

use alloy::primitives::{Address, TxHash};
use tool_utils::run_command_captured;
use tracing::info;

use crate::{
    constants::{
        CREATE_COMMAND, DEPLOYED_TO_MARKER, DEPLOYER_MARKER, ETHERSCAN_KEY_ENV_VAR,
        FORGE_COMMAND, REDACTED, TX_HASH_MARKER,
    },
    errors::ScriptError,
    redact::redact_url,
};

/// A fully resolved `forge create` invocation
#[derive(Clone, Debug)]
pub struct ForgeCreate {
    /// The RPC URL to deploy through
    pub rpc_url: String,
    /// The chain ID of the target network
    pub chain_id: u64,
    /// The deployer's private key
    pub private_key: String,
    /// The block explorer API key used for source verification
    pub etherscan_api_key: Option<String>,
    /// Whether to verify the contract source on the block explorer
    pub verify: bool,
    /// The contract identifier, in `path:ContractName` form
    pub contract: String,
    /// The constructor arguments, in declaration order
    pub constructor_args: Vec<String>,
    /// The forge project root, defaults to the working directory
    pub root: Option<PathBuf>,
}

/// The result of a `forge create` run, as reported on its output
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForgeDeployment {
    /// The address that sent the deployment transaction
    pub deployer: Option<Address>,
    /// The address of the deployed contract
    pub deployed_to: Address,
    /// The hash of the deployment transaction
    pub transaction_hash: Option<TxHash>,
}

impl ForgeCreate {
    /// Check that the invocation can be run at all
    pub fn validate(&self) -> Result<(), ScriptError> {
        if self.verify && self.etherscan_api_key.is_none() {
            return Err(ScriptError::MissingCredential(format!(
                "{ETHERSCAN_KEY_ENV_VAR} is required to verify {}",
                self.contract
            )));
        }

        if !self.contract.contains(':') {
            return Err(ScriptError::ContractDeployment(format!(
                "contract identifier `{}` must be of the form `path:ContractName`",
                self.contract
            )));
        }

        Ok(())
    }

    /// The name of the contract being deployed
    pub fn contract_name(&self) -> &str {
        contract_name(&self.contract)
    }

    /// The arguments passed to `forge`
    ///
    /// `--constructor-args` is variadic, so it must come last
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            CREATE_COMMAND.to_string(),
            "--rpc-url".to_string(),
            self.rpc_url.clone(),
            "--chain".to_string(),
            self.chain_id.to_string(),
            "--private-key".to_string(),
            self.private_key.clone(),
        ];

        if self.verify {
            if let Some(key) = &self.etherscan_api_key {
                args.push("--etherscan-api-key".to_string());
                args.push(key.clone());
            }
            args.push("--verify".to_string());
        }

        args.push("--broadcast".to_string());
        args.push(self.contract.clone());

        if !self.constructor_args.is_empty() {
            args.push("--constructor-args".to_string());
            args.extend(self.constructor_args.iter().cloned());
        }

        args
    }

    /// The command line with secrets masked, suitable for logging
    pub fn redacted(&self) -> String {
        let mut secrets = vec![self.private_key.as_str()];
        if let Some(key) = &self.etherscan_api_key {
            secrets.push(key.as_str());
        }

        let args = self.args().into_iter().map(|arg| {
            if secrets.contains(&arg.as_str()) {
                REDACTED.to_string()
            } else if arg == self.rpc_url {
                redact_url(&arg)
            } else if arg.contains(char::is_whitespace) {
                format!("'{arg}'")
            } else {
                arg
            }
        });

        std::iter::once(FORGE_COMMAND.to_string())
            .chain(args)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Build the process to run
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(FORGE_COMMAND);
        if let Some(root) = &self.root {
            cmd.current_dir(root);
        }
        cmd.args(self.args());
        cmd
    }
}

/// Run `forge create`, returning the deployment it reports
///
/// Assumes that `forge` is locally available
pub fn deploy_with_forge(create: &ForgeCreate) -> Result<ForgeDeployment, ScriptError> {
    create.validate()?;
    info!("Running `{}`", create.redacted());

    let output = run_command_captured(create.command())
        .map_err(|e| ScriptError::ContractCompilation(e.to_string()))?;

    parse_forge_output(&output)
}

/// Extract the deployment details from the output of `forge create`
pub fn parse_forge_output(output: &str) -> Result<ForgeDeployment, ScriptError> {
    let deployed_to = find_marked_value(output, DEPLOYED_TO_MARKER)
        .ok_or_else(|| {
            ScriptError::ContractDeployment("no deployed address in forge output".to_string())
        })
        .and_then(|addr| {
            Address::from_str(addr).map_err(|e| ScriptError::ContractDeployment(e.to_string()))
        })?;

    let deployer = find_marked_value(output, DEPLOYER_MARKER)
        .and_then(|addr| Address::from_str(addr).ok());
    let transaction_hash =
        find_marked_value(output, TX_HASH_MARKER).and_then(|hash| TxHash::from_str(hash).ok());

    Ok(ForgeDeployment {
        deployer,
        deployed_to,
        transaction_hash,
    })
}

/// The contract name of a `path:ContractName` identifier
pub fn contract_name(contract: &str) -> &str {
    contract.rsplit(':').next().unwrap_or(contract)
}

/// Find the first token following `marker` on any line of `output`
fn find_marked_value<'a>(output: &'a str, marker: &str) -> Option<&'a str> {
    output.lines().find_map(|line| {
        let (_, rest) = line.split_once(marker)?;
        rest.split_whitespace().next()
    })
}
