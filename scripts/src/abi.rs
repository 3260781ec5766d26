//! Loading contract ABIs and encoding calls against them

use std::path::Path;

use alloy::{
    dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt, Specifier},
    hex,
    json_abi::{Function, JsonAbi},
};
use serde_json::Value;

use crate::{constants::ARTIFACT_ABI_KEY, deployments::get_json_from_file, errors::ScriptError};

/// The Solidity type of the single parameter of an address setter
const ADDRESS_TYPE: &str = "address";

/// Load a contract ABI from a JSON file
///
/// Accepts either a bare ABI array or a Foundry artifact with the ABI nested
/// under the `abi` key
pub fn load_abi(file_path: &Path) -> Result<JsonAbi, ScriptError> {
    let value = get_json_from_file(file_path)?;
    parse_abi(value)
}

/// Parse a contract ABI out of a JSON value, see [`load_abi`]
pub fn parse_abi(value: Value) -> Result<JsonAbi, ScriptError> {
    let abi_value = match value {
        Value::Object(mut artifact) => artifact.remove(ARTIFACT_ABI_KEY).ok_or_else(|| {
            ScriptError::ArtifactParsing(format!("artifact has no `{ARTIFACT_ABI_KEY}` key"))
        })?,
        value => value,
    };

    serde_json::from_value(abi_value).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))
}

/// The overloads of a function, by bare name or by full signature
///
/// A signature such as `set(address)` selects the single matching overload
pub fn find_overloads<'a>(abi: &'a JsonAbi, name: &str) -> Result<Vec<&'a Function>, ScriptError> {
    let (base, signature) = match name.split_once('(') {
        Some((base, _)) => (base, Some(name.replace(' ', ""))),
        None => (name, None),
    };

    let overloads: Vec<&Function> = abi
        .function(base)
        .into_iter()
        .flatten()
        .filter(|f| signature.as_ref().map_or(true, |sig| f.signature() == *sig))
        .collect();

    if overloads.is_empty() {
        return Err(ScriptError::CalldataConstruction(format!(
            "function `{name}` not found in ABI"
        )));
    }
    Ok(overloads)
}

/// Select the overload of `name` that the given arguments encode for,
/// returning it along with the coerced arguments
///
/// Every overload of the right arity whose parameters all accept the
/// arguments is a candidate; more than one candidate is ambiguous and must
/// be resolved by passing the full signature
pub fn select_function<'a>(
    abi: &'a JsonAbi,
    name: &str,
    args: &[String],
) -> Result<(&'a Function, Vec<DynSolValue>), ScriptError> {
    let same_arity: Vec<&Function> = find_overloads(abi, name)?
        .into_iter()
        .filter(|f| f.inputs.len() == args.len())
        .collect();

    if same_arity.is_empty() {
        return Err(ScriptError::CalldataConstruction(format!(
            "no overload of `{name}` takes {} argument(s)",
            args.len()
        )));
    }

    let mut last_err = None;
    let mut candidates = Vec::new();
    for function in same_arity {
        match coerce_args(function, args) {
            Ok(values) => candidates.push((function, values)),
            Err(e) => last_err = Some(e),
        }
    }

    match candidates.len() {
        1 => Ok(candidates.remove(0)),
        0 => Err(last_err.unwrap_or_else(|| {
            ScriptError::CalldataConstruction(format!(
                "no overload of `{name}` accepts the arguments"
            ))
        })),
        _ => {
            let signatures: Vec<String> = candidates.iter().map(|(f, _)| f.signature()).collect();
            Err(ScriptError::CalldataConstruction(format!(
                "arguments match several overloads of `{name}`, pass one of {} as the function",
                signatures.join(", ")
            )))
        }
    }
}

/// Find the overload of `name` that takes a single address
pub fn find_address_setter<'a>(abi: &'a JsonAbi, name: &str) -> Result<&'a Function, ScriptError> {
    find_overloads(abi, name)?
        .into_iter()
        .find(|f| f.inputs.len() == 1 && f.inputs[0].ty == ADDRESS_TYPE)
        .ok_or_else(|| {
            ScriptError::CalldataConstruction(format!(
                "no overload of `{name}` takes a single address, `{name}` is not an address setter"
            ))
        })
}

/// Coerce string arguments into the parameter types of `function`
pub fn coerce_args(function: &Function, args: &[String]) -> Result<Vec<DynSolValue>, ScriptError> {
    function
        .inputs
        .iter()
        .zip(args)
        .map(|(param, arg)| {
            let ty = param
                .resolve()
                .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?;
            ty.coerce_str(arg).map_err(|e| {
                ScriptError::CalldataConstruction(format!(
                    "`{arg}` is not a valid `{}` for `{}`: {e}",
                    param.ty, param.name
                ))
            })
        })
        .collect()
}

/// Encode a call to `function` with already coerced arguments
pub fn encode_function(function: &Function, values: &[DynSolValue]) -> Result<Vec<u8>, ScriptError> {
    function
        .abi_encode_input(values)
        .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))
}

/// Prepare calldata for calling `name` with the given arguments
pub fn encode_call(abi: &JsonAbi, name: &str, args: &[String]) -> Result<Vec<u8>, ScriptError> {
    let (function, values) = select_function(abi, name, args)?;
    encode_function(function, &values)
}

/// Decode the return data of a call to `function`
pub fn decode_output(function: &Function, data: &[u8]) -> Result<Vec<DynSolValue>, ScriptError> {
    function
        .abi_decode_output(data, true /* validate */)
        .map_err(|e| ScriptError::Serde(e.to_string()))
}

/// Render a decoded value for display
pub fn format_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Address(addr) => addr.to_checksum(None),
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::String(s) => format!("{s:?}"),
        DynSolValue::Bytes(b) => hex::encode_prefixed(b),
        DynSolValue::FixedBytes(word, size) => hex::encode_prefixed(&word[..*size]),
        DynSolValue::Array(values) | DynSolValue::FixedArray(values) => {
            format!("[{}]", format_values(values))
        }
        DynSolValue::Tuple(values) => format!("({})", format_values(values)),
        other => format!("{other:?}"),
    }
}

/// Render a list of decoded values, comma separated
fn format_values(values: &[DynSolValue]) -> String {
    values.iter().map(format_value).collect::<Vec<_>>().join(", ")
}
