//! Scripts for deploying and configuring the Autograph smart contracts.

#![deny(missing_docs)]

pub mod abi;
pub mod cli;
mod commands;
pub mod constants;
pub mod deployments;
pub mod errors;
pub mod forge;
pub mod redact;
pub mod rpc;
pub mod types;
