//! Binary-level tests of the deploy commands, run with `--dry-run` so that
//! no forge installation or network is needed

use std::{fs, path::Path, process::Command};

use assert_cmd::prelude::*;
use tempfile::tempdir;

const BIN: &str = "autograph-deploy";

/// The first default account of an Anvil node
const PKEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

const OPEN_ACTION: &str = "src/AutographOpenAction.sol:AutographOpenAction";

const OPEN_ACTION_ARGS: [&str; 6] = [
    "metadata",
    "0xA2574D9DdB6A325Ad2Be838Bd854228B80215148",
    "0x9E81eD8099dF82004D298144138C12AbB959DF1E",
    "0x883a24A5315c0E4Ff4451E6E2B760338FDC8faE8",
    "0xe57438297515C4B7c62FE13957413085A7e1763c",
    "0xb1931e410FC5Abe6581E3308018c9d6b173c16BF",
];

/// A command running in `dir` with only the given credentials configured
fn deploy_cmd(dir: &Path, envs: &[(&str, &str)]) -> Command {
    let mut cmd = keyless_cmd(dir, envs);
    cmd.env("PRIVATE_KEY", PKEY);
    cmd
}

/// A command running in `dir` with no private key configured
fn keyless_cmd(dir: &Path, envs: &[(&str, &str)]) -> Command {
    let mut cmd = Command::cargo_bin(BIN).unwrap();
    cmd.current_dir(dir)
        .env_remove("ALCHEMY_AMOY_KEY")
        .env_remove("ETHERSCAN_API_KEY")
        .env_remove("RPC_URL")
        .env_remove("NETWORK")
        .env_remove("DEPLOYMENTS_PATH")
        .env_remove("PRIVATE_KEY");
    for (key, value) in envs {
        cmd.env(key, value);
    }
    cmd
}

#[test]
fn dry_run_prints_redacted_forge_command() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut cmd = deploy_cmd(
        dir.path(),
        &[("ALCHEMY_AMOY_KEY", "alchemy-secret"), ("ETHERSCAN_API_KEY", "scan-secret")],
    );
    cmd.args(["deploy", "--dry-run", "--contract", OPEN_ACTION, "--constructor-args"])
        .args(OPEN_ACTION_ARGS);

    let output = cmd.output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let expected = format!(
        "forge create --rpc-url https://polygon-amoy.g.alchemy.com/<redacted> --chain 80002 \
         --private-key <redacted> --etherscan-api-key <redacted> --verify --broadcast {} \
         --constructor-args {}",
        OPEN_ACTION,
        OPEN_ACTION_ARGS.join(" ")
    );
    assert_eq!(stdout.trim(), expected);
    assert!(!stdout.contains("alchemy-secret"));
    assert!(!stdout.contains(PKEY));

    // A dry run records nothing
    assert!(!dir.path().join("deployments.amoy.json").exists());
    Ok(())
}

#[test]
fn dry_run_plan_resolves_recorded_deployments() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("deploy-plan.json"),
        r#"{
            "contracts": [
                { "name": "PrintSplits", "artifact": "src/PrintSplits.sol:PrintSplits" },
                {
                    "name": "AutographData",
                    "artifact": "src/AutographData.sol:AutographData",
                    "constructor_args": ["$PrintSplits", "$AutographAccessControl"]
                }
            ]
        }"#,
    )?;
    fs::write(
        dir.path().join("deployments.devnet.json"),
        r#"{ "deployments": { "AutographAccessControl": "0x883a24a5315c0e4ff4451e6e2b760338fdc8fae8" } }"#,
    )?;

    let mut cmd = deploy_cmd(dir.path(), &[]);
    cmd.args(["--network", "devnet", "deploy-plan", "--dry-run", "--no-verify"]);

    let output = cmd.output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("forge create --rpc-url http://127.0.0.1:8545 --chain 31337"));
    assert!(lines[0].ends_with("--broadcast src/PrintSplits.sol:PrintSplits"));
    assert!(lines[1].ends_with(
        "--constructor-args $PrintSplits 0x883a24a5315c0e4ff4451e6e2b760338fdc8fae8"
    ));
    assert!(!stdout.contains("--verify"));
    Ok(())
}

#[test]
fn hosted_network_requires_api_key() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut cmd = deploy_cmd(dir.path(), &[("ETHERSCAN_API_KEY", "scan-secret")]);
    cmd.args(["deploy", "--dry-run", "--contract", OPEN_ACTION]);

    let output = cmd.output()?;
    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr)?.contains("ALCHEMY_AMOY_KEY"));
    Ok(())
}

#[test]
fn verification_requires_explorer_key() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut cmd = deploy_cmd(dir.path(), &[("ALCHEMY_AMOY_KEY", "alchemy-secret")]);
    cmd.args(["deploy", "--dry-run", "--contract", OPEN_ACTION]);

    let output = cmd.output()?;
    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr)?.contains("ETHERSCAN_API_KEY"));

    // Skipping verification needs no explorer key
    let mut cmd = deploy_cmd(dir.path(), &[("ALCHEMY_AMOY_KEY", "alchemy-secret")]);
    cmd.args(["deploy", "--dry-run", "--no-verify", "--contract", OPEN_ACTION]);
    assert!(cmd.output()?.status.success());
    Ok(())
}

#[test]
fn dry_run_masks_override_url() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut cmd = deploy_cmd(
        dir.path(),
        &[("RPC_URL", "https://polygon-amoy.infura.io/v3/INFURASECRET")],
    );
    cmd.args(["deploy", "--dry-run", "--no-verify", "--contract", OPEN_ACTION]);

    let output = cmd.output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("--rpc-url https://polygon-amoy.infura.io/<redacted>"));
    assert!(!stdout.contains("INFURASECRET"));
    assert!(!String::from_utf8(output.stderr)?.contains("INFURASECRET"));
    Ok(())
}

#[test]
fn dry_run_needs_no_private_key() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut cmd = keyless_cmd(dir.path(), &[]);
    cmd.args(["--network", "devnet", "deploy", "--dry-run", "--no-verify"])
        .args(["--contract", OPEN_ACTION]);

    let output = cmd.output()?;
    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout)?.contains("--private-key <redacted>"));

    // A real deploy needs the key before forge is run
    let mut cmd = keyless_cmd(dir.path(), &[]);
    cmd.args(["--network", "devnet", "deploy", "--no-verify"])
        .args(["--contract", OPEN_ACTION]);

    let output = cmd.output()?;
    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr)?.contains("PRIVATE_KEY"));
    Ok(())
}

#[test]
fn dry_run_reports_broken_deployments_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("deployments.devnet.json"), "{ not json")?;

    let mut cmd = deploy_cmd(dir.path(), &[]);
    cmd.args([
        "--network",
        "devnet",
        "deploy",
        "--dry-run",
        "--no-verify",
        "--contract",
        OPEN_ACTION,
        "--constructor-args",
        "$PrintSplits",
    ]);

    let output = cmd.output()?;
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    Ok(())
}

#[test]
fn malformed_env_file_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join(".env"), "NOT_A_PAIR 'unterminated\n")?;

    let mut cmd = deploy_cmd(dir.path(), &[]);
    cmd.args(["--network", "devnet", "deploy", "--dry-run", "--no-verify"])
        .args(["--contract", OPEN_ACTION]);

    let output = cmd.output()?;
    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr)?.contains(".env"));
    Ok(())
}
