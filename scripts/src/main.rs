use clap::Parser;
use scripts::{
    cli::{Cli, Context},
    errors::ScriptError,
};

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    // Credentials may live in a `.env` file, load it before clap reads the environment
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(ScriptError::ReadFile(format!(".env: {e}")));
        }
    }
    let cli = Cli::parse();

    // Logs go to stderr, stdout carries receipts and dry-run commands
    tracing_subscriber::fmt()
        .pretty()
        .with_writer(std::io::stderr)
        .init();

    let ctx = Context::try_from(&cli)?;
    cli.command.run(ctx).await
}
