//! Implementations of the various deploy scripts

use std::{path::PathBuf, str::FromStr};

use alloy::{primitives::Address, rpc::types::TransactionReceipt};
use tool_utils::{is_valid_eth_address_format, prompt_for_eth_address};
use tracing::{info, warn};

use crate::{
    abi::{
        coerce_args, decode_output, encode_function, find_address_setter, format_value, load_abi,
        select_function,
    },
    cli::{CallArgs, Context, DeployArgs, DeployPlanArgs, SendArgs, SetAddressArgs},
    constants::REDACTED,
    deployments::{
        resolve_arg, resolve_args, resolve_known_arg, write_deployed_address, DeployPlan,
        PlannedContract,
    },
    errors::ScriptError,
    forge::{contract_name, deploy_with_forge, ForgeCreate},
    rpc::{call_contract, send_contract_call, setup_client, setup_read_client},
};

// ----------
// | Deploy |
// ----------

/// Options that apply to every contract in a deploy run
struct DeployOptions {
    /// Skip source verification regardless of the plan
    no_verify: bool,
    /// Print the commands instead of running them
    dry_run: bool,
    /// The forge project root
    root: Option<PathBuf>,
}

pub fn deploy(args: DeployArgs, ctx: &Context) -> Result<(), ScriptError> {
    let planned = match &args.from_plan {
        Some(plan_name) => {
            let plan = DeployPlan::from_file(&args.plan)?;
            let mut entry = plan.get(plan_name)?.clone();
            if let Some(name) = args.name.clone() {
                entry.name = name;
            }
            entry
        }
        None => {
            // Clap guarantees one of `--contract` and `--from-plan`
            let artifact = args.contract.clone().ok_or_else(|| {
                ScriptError::ContractDeployment("no contract given".to_string())
            })?;
            let name = args
                .name
                .clone()
                .unwrap_or_else(|| contract_name(&artifact).to_string());

            PlannedContract {
                name,
                artifact,
                constructor_args: args.constructor_args.clone(),
                verify: true,
            }
        }
    };

    let opts = DeployOptions {
        no_verify: args.no_verify,
        dry_run: args.dry_run,
        root: args.root,
    };
    deploy_contract(&planned, &opts, ctx)
}

pub fn deploy_plan(args: DeployPlanArgs, ctx: &Context) -> Result<(), ScriptError> {
    let plan = DeployPlan::from_file(&args.plan)?;
    let opts = DeployOptions {
        no_verify: args.no_verify,
        dry_run: args.dry_run,
        root: args.root,
    };

    info!(
        "Deploying {} contract(s) from {} to {}",
        plan.contracts.len(),
        args.plan.display(),
        ctx.network
    );
    for planned in plan.contracts.iter() {
        deploy_contract(planned, &opts, ctx)?;
    }

    Ok(())
}

/// Deploy a single planned contract and record its address
fn deploy_contract(
    planned: &PlannedContract,
    opts: &DeployOptions,
    ctx: &Context,
) -> Result<(), ScriptError> {
    // References to contracts not yet deployed are left as-is in a dry run
    let constructor_args = if opts.dry_run {
        planned
            .constructor_args
            .iter()
            .map(|arg| resolve_known_arg(arg, &ctx.deployments_path))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        resolve_args(&planned.constructor_args, &ctx.deployments_path)?
    };

    // A dry run signs nothing, so the key may be absent
    let private_key = match (ctx.signing_key(), opts.dry_run) {
        (Ok(key), _) => key.to_string(),
        (Err(_), true) => REDACTED.to_string(),
        (Err(e), false) => return Err(e),
    };

    let create = ForgeCreate {
        rpc_url: ctx.rpc_url.clone(),
        chain_id: ctx.network.chain_id(),
        private_key,
        etherscan_api_key: ctx.etherscan_api_key.clone(),
        verify: planned.verify && !opts.no_verify,
        contract: planned.artifact.clone(),
        constructor_args,
        root: opts.root.clone(),
    };
    create.validate()?;

    if opts.dry_run {
        println!("{}", create.redacted());
        return Ok(());
    }

    info!("Deploying `{}` to {}", planned.name, ctx.network);
    let deployment = deploy_with_forge(&create)?;

    info!(
        "`{}` deployed at {:#x}",
        planned.name, deployment.deployed_to
    );
    write_deployed_address(
        &ctx.deployments_path,
        &planned.name,
        deployment.deployed_to,
    )
}

// -------------
// | Configure |
// -------------

/// Call a one-address setter, checking the ABI agrees that it is one
pub async fn set_address(args: SetAddressArgs, ctx: &Context) -> Result<(), ScriptError> {
    let abi = load_abi(&args.target.abi)?;
    let setter = find_address_setter(&abi, &args.target.function)?;

    let address = match args.address {
        Some(address) => address,
        None => prompt_for_eth_address(&format!(
            "Enter the address to pass to `{}`",
            args.target.function
        ))
        .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?,
    };
    let address = resolve_arg(&address, &ctx.deployments_path)?;
    if !is_valid_eth_address_format(&address) {
        return Err(ScriptError::CalldataConstruction(format!(
            "`{address}` is not a valid address"
        )));
    }

    let values = coerce_args(setter, &[address])?;
    let calldata = encode_function(setter, &values)?;
    let receipt = send_calldata(&args.target.contract, &setter.name, calldata, ctx).await?;
    print_receipt(&receipt)
}

pub async fn send(args: SendArgs, ctx: &Context) -> Result<(), ScriptError> {
    let abi = load_abi(&args.target.abi)?;
    let call_args = resolve_args(&args.args, &ctx.deployments_path)?;
    let (function, values) = select_function(&abi, &args.target.function, &call_args)?;
    let calldata = encode_function(function, &values)?;

    let receipt = send_calldata(&args.target.contract, &function.name, calldata, ctx).await?;
    print_receipt(&receipt)
}

pub async fn call(args: CallArgs, ctx: &Context) -> Result<(), ScriptError> {
    let abi = load_abi(&args.target.abi)?;
    let call_args = resolve_args(&args.args, &ctx.deployments_path)?;
    let contract = resolve_contract(&args.target.contract, ctx)?;
    let (function, values) = select_function(&abi, &args.target.function, &call_args)?;
    let calldata = encode_function(function, &values)?;

    let client = match &ctx.priv_key {
        Some(key) => setup_client(key, &ctx.rpc_url)?,
        None => setup_read_client(&ctx.rpc_url)?,
    };
    let output = call_contract(&client, contract, calldata).await?;
    let values = decode_output(function, &output)?;

    if values.is_empty() {
        warn!("`{}` returned no values", function.name);
    }
    for value in values.iter() {
        println!("{}", format_value(value));
    }

    Ok(())
}

/// Send encoded calldata to the targeted contract, returning the receipt
async fn send_calldata(
    contract: &str,
    function: &str,
    calldata: Vec<u8>,
    ctx: &Context,
) -> Result<TransactionReceipt, ScriptError> {
    let contract = resolve_contract(contract, ctx)?;
    let client = setup_client(ctx.signing_key()?, &ctx.rpc_url)?;
    if let Some(signer) = client.signer {
        info!("Calling `{function}` on {contract:#x} from {signer:#x}");
    }

    send_contract_call(&client, contract, calldata).await
}

/// Parse a contract address, resolving `$Name` references
fn resolve_contract(contract: &str, ctx: &Context) -> Result<Address, ScriptError> {
    let contract = resolve_arg(contract, &ctx.deployments_path)?;
    Address::from_str(&contract).map_err(|e| ScriptError::CalldataConstruction(e.to_string()))
}

/// Print a transaction receipt as pretty JSON
fn print_receipt(receipt: &TransactionReceipt) -> Result<(), ScriptError> {
    let json =
        serde_json::to_string_pretty(receipt).map_err(|e| ScriptError::Serde(e.to_string()))?;
    println!("{json}");

    Ok(())
}
