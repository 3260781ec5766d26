//! Shell and terminal helpers shared by the deploy tooling

use alloy_primitives::Address;
use eyre::{eyre, Result};
use std::io::{self, BufRead, BufReader, Write};
use std::process::{Command, Stdio};
use std::str::FromStr;

/// Execute a command, echoing its stdout to our stderr as it arrives and
/// returning everything it printed
///
/// Stderr is inherited so that compiler diagnostics stay visible. Our own
/// stdout is left to the caller.
pub fn run_command_captured(cmd: Command) -> Result<String> {
    run_command_echoing(cmd, io::stderr())
}

/// Execute a command, echoing its stdout line by line to `echo` and
/// returning everything it printed
pub fn run_command_echoing<W: Write>(mut cmd: Command, mut echo: W) -> Result<String> {
    cmd.stdout(Stdio::piped()).stderr(Stdio::inherit());
    let mut child = cmd.spawn()?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| eyre!("Command stdout was not captured"))?;

    let mut captured = String::new();
    for line in BufReader::new(stdout).lines() {
        let line = line?;
        writeln!(echo, "{line}")?;
        captured.push_str(&line);
        captured.push('\n');
    }

    let status = child.wait()?;
    if status.success() {
        Ok(captured)
    } else {
        Err(eyre!("Command failed with status: {}", status))
    }
}

/// General function to prompt for input with a specific message
pub fn prompt_for_input(prompt: &str) -> io::Result<String> {
    print!("{}: ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_string())
}

/// Function to prompt user for a valid Ethereum address
pub fn prompt_for_eth_address(prompt: &str) -> Result<String> {
    loop {
        let input = prompt_for_input(prompt)?;

        if is_valid_eth_address_format(&input) {
            return Ok(input);
        } else {
            println!("Invalid Ethereum address format. Please enter a valid address (0x followed by 40 hex characters).");
        }
    }
}

/// Function to validate an Ethereum address format
pub fn is_valid_eth_address_format(address: &str) -> bool {
    Address::from_str(address).is_ok()
}
