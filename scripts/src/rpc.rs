//! The RPC client and the transactions sent through it

use std::{fmt::Display, str::FromStr};

use alloy::{
    network::{Ethereum, EthereumWallet, TransactionBuilder},
    primitives::{Address, Bytes},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::{TransactionReceipt, TransactionRequest},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use tracing::{error, info};

use crate::{constants::PRIVATE_KEY_ENV_VAR, errors::ScriptError, redact::scrub_url};

/// The provider type used by the scripts
pub type Client = DynProvider<Ethereum>;

/// A provider along with the address of the key that signs for it, if any
#[derive(Clone)]
pub struct RpcClient {
    /// The provider, with the signer attached as its wallet when there is one
    pub provider: Client,
    /// The address of the signer
    pub signer: Option<Address>,
    /// The RPC URL, kept to scrub it from transport errors
    rpc_url: String,
}

impl RpcClient {
    /// Render an error with the RPC URL masked
    fn scrub(&self, e: impl Display) -> String {
        scrub_url(&e.to_string(), &self.rpc_url)
    }
}

/// Sets up a client that signs with the given private key and sends
/// transactions to the given RPC url
pub fn setup_client(priv_key: &str, rpc_url: &str) -> Result<RpcClient, ScriptError> {
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let address = signer.address();

    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .on_http(parse_rpc_url(rpc_url)?);

    Ok(RpcClient {
        provider: DynProvider::new(provider),
        signer: Some(address),
        rpc_url: rpc_url.to_string(),
    })
}

/// Sets up a client for read-only calls, no key is needed
pub fn setup_read_client(rpc_url: &str) -> Result<RpcClient, ScriptError> {
    let provider = ProviderBuilder::new().on_http(parse_rpc_url(rpc_url)?);

    Ok(RpcClient {
        provider: DynProvider::new(provider),
        signer: None,
        rpc_url: rpc_url.to_string(),
    })
}

/// Parse an RPC URL without echoing it into the error
fn parse_rpc_url(rpc_url: &str) -> Result<Url, ScriptError> {
    Url::parse(rpc_url)
        .map_err(|e| ScriptError::ClientInitialization(format!("invalid RPC URL: {e}")))
}

/// Sign and submit a call to `contract` with the given calldata, waiting for
/// its receipt
///
/// Failures are logged before being returned
pub async fn send_contract_call(
    client: &RpcClient,
    contract: Address,
    calldata: Vec<u8>,
) -> Result<TransactionReceipt, ScriptError> {
    submit_call(client, contract, calldata)
        .await
        .inspect_err(|e| error!("Transaction to {contract:#x} failed: {e}"))
}

/// Build, sign, and submit the transaction, see [`send_contract_call`]
async fn submit_call(
    client: &RpcClient,
    contract: Address,
    calldata: Vec<u8>,
) -> Result<TransactionReceipt, ScriptError> {
    let from = client.signer.ok_or_else(|| {
        ScriptError::MissingCredential(format!(
            "{PRIVATE_KEY_ENV_VAR} is required to sign transactions"
        ))
    })?;
    let provider = &client.provider;

    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(client.scrub(e)))?;
    let nonce = provider
        .get_transaction_count(from)
        .await
        .map_err(|e| ScriptError::NonceFetching(client.scrub(e)))?;

    let tx = TransactionRequest::default()
        .with_from(from)
        .with_to(contract)
        .with_input(Bytes::from(calldata))
        .with_nonce(nonce)
        .with_chain_id(chain_id);

    let pending_tx = provider
        .send_transaction(tx)
        .await
        .map_err(|e| ScriptError::ContractInteraction(client.scrub(e)))?;
    info!("Submitted transaction {:#x} with nonce {nonce}", pending_tx.tx_hash());

    let receipt = pending_tx
        .get_receipt()
        .await
        .map_err(|e| ScriptError::ContractInteraction(client.scrub(e)))?;

    check_receipt(receipt)
}

/// Reject the receipt of a reverted transaction
pub fn check_receipt(receipt: TransactionReceipt) -> Result<TransactionReceipt, ScriptError> {
    if !receipt.status() {
        return Err(ScriptError::ContractInteraction(format!(
            "transaction {:#x} reverted",
            receipt.transaction_hash
        )));
    }

    Ok(receipt)
}

/// Execute a read-only call against `contract`, returning the raw return data
pub async fn call_contract(
    client: &RpcClient,
    contract: Address,
    calldata: Vec<u8>,
) -> Result<Bytes, ScriptError> {
    let mut tx = TransactionRequest::default()
        .with_to(contract)
        .with_input(Bytes::from(calldata));
    if let Some(from) = client.signer {
        tx = tx.with_from(from);
    }

    client
        .provider
        .call(&tx)
        .await
        .map_err(|e| ScriptError::ContractInteraction(client.scrub(e)))
}
