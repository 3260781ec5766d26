//! Reading and writing the deployments file, and parsing deploy plans

use std::{fs, path::Path, str::FromStr};

use alloy::primitives::Address;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    constants::{DEPLOYMENTS_KEY, DEPLOYMENT_REF_PREFIX, JSON_INDENT},
    errors::ScriptError,
};

// ---------------
// | Deployments |
// ---------------

/// Parse a JSON file into a value
pub fn get_json_from_file(file_path: &Path) -> Result<Value, ScriptError> {
    let contents = fs::read_to_string(file_path)
        .map_err(|e| ScriptError::ReadFile(format!("{}: {}", file_path.display(), e)))?;

    serde_json::from_str(&contents).map_err(|e| ScriptError::Serde(e.to_string()))
}

/// Look up the address recorded for `contract_key`, if any
///
/// A missing file or entry is `None`, a malformed file or address is an error
pub fn find_deployed_address(
    file_path: &Path,
    contract_key: &str,
) -> Result<Option<Address>, ScriptError> {
    if !file_path.exists() {
        return Ok(None);
    }

    let parsed_json = get_json_from_file(file_path)?;
    let Some(entry) = parsed_json
        .get(DEPLOYMENTS_KEY)
        .and_then(|deployments| deployments.get(contract_key))
    else {
        return Ok(None);
    };

    let addr = entry.as_str().ok_or_else(|| {
        ScriptError::ReadFile(format!("entry for `{contract_key}` is not a string"))
    })?;
    Address::from_str(addr)
        .map(Some)
        .map_err(|e| ScriptError::ReadFile(format!("entry for `{contract_key}`: {e}")))
}

/// Read the address recorded for `contract_key` in the deployments file
pub fn read_deployed_address(file_path: &Path, contract_key: &str) -> Result<Address, ScriptError> {
    find_deployed_address(file_path, contract_key)?.ok_or_else(|| {
        ScriptError::ReadFile(format!(
            "no address for `{}` in {}",
            contract_key,
            file_path.display()
        ))
    })
}

/// Record the address of a deployed contract, creating the file if needed
pub fn write_deployed_address(
    file_path: &Path,
    contract_key: &str,
    address: Address,
) -> Result<(), ScriptError> {
    let mut parsed_json = if file_path.exists() {
        get_json_from_file(file_path)?
    } else {
        Value::Object(Map::new())
    };

    let root = parsed_json.as_object_mut().ok_or_else(|| {
        ScriptError::WriteFile(format!("{} is not a JSON object", file_path.display()))
    })?;
    let deployments = root
        .entry(DEPLOYMENTS_KEY)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| {
            ScriptError::WriteFile(format!("`{DEPLOYMENTS_KEY}` is not a JSON object"))
        })?;
    deployments.insert(
        contract_key.to_string(),
        Value::String(format!("{address:#x}")),
    );

    fs::write(file_path, to_pretty_json(&parsed_json)?)
        .map_err(|e| ScriptError::WriteFile(e.to_string()))
}

/// Serialize a value as JSON indented the way the deployments file is
fn to_pretty_json(value: &Value) -> Result<String, ScriptError> {
    let indent = " ".repeat(JSON_INDENT);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());

    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    serde::Serialize::serialize(value, &mut ser)
        .map_err(|e| ScriptError::Serde(e.to_string()))?;

    String::from_utf8(buf).map_err(|e| ScriptError::Serde(e.to_string()))
}

/// Resolve a `$Name` reference to the address recorded for `Name`,
/// passing any other argument through unchanged
pub fn resolve_arg(arg: &str, deployments_path: &Path) -> Result<String, ScriptError> {
    match arg.strip_prefix(DEPLOYMENT_REF_PREFIX) {
        Some(key) => {
            let addr = read_deployed_address(deployments_path, key)?;
            Ok(format!("{addr:#x}"))
        }
        None => Ok(arg.to_string()),
    }
}

/// Resolve a `$Name` reference if `Name` has been recorded, leaving it as-is
/// otherwise
pub fn resolve_known_arg(arg: &str, deployments_path: &Path) -> Result<String, ScriptError> {
    match arg.strip_prefix(DEPLOYMENT_REF_PREFIX) {
        Some(key) => Ok(find_deployed_address(deployments_path, key)?
            .map(|addr| format!("{addr:#x}"))
            .unwrap_or_else(|| arg.to_string())),
        None => Ok(arg.to_string()),
    }
}

/// Resolve every argument in a list, see [`resolve_arg`]
pub fn resolve_args(args: &[String], deployments_path: &Path) -> Result<Vec<String>, ScriptError> {
    args.iter()
        .map(|arg| resolve_arg(arg, deployments_path))
        .collect()
}

// --------
// | Plan |
// --------

/// A contract entry in the deploy plan
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct PlannedContract {
    /// The key under which the deployed address is recorded
    pub name: String,
    /// The contract identifier, in `path:ContractName` form
    pub artifact: String,
    /// The constructor arguments, `$Name` entries refer to earlier deployments
    #[serde(default)]
    pub constructor_args: Vec<String>,
    /// Whether to verify the source on the block explorer
    #[serde(default = "default_verify")]
    pub verify: bool,
}

/// Contracts are verified unless the plan says otherwise
fn default_verify() -> bool {
    true
}

/// An ordered list of contracts to deploy
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct DeployPlan {
    /// The contracts, in deployment order
    pub contracts: Vec<PlannedContract>,
}

impl DeployPlan {
    /// Read a deploy plan from a JSON file
    pub fn from_file(file_path: &Path) -> Result<Self, ScriptError> {
        let value = get_json_from_file(file_path)?;
        serde_json::from_value(value).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))
    }

    /// Look up a planned contract by name
    pub fn get(&self, name: &str) -> Result<&PlannedContract, ScriptError> {
        self.contracts
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| ScriptError::ArtifactParsing(format!("`{name}` is not in the plan")))
    }
}
