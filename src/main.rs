// src/main.rs

use rebake::errors::{RebakeError, Result};
use rebake::{cli, logging, run};

#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(()) => {}
        Err(RebakeError::Interrupted(kind)) => {
            std::process::exit(kind.exit_code());
        }
        Err(err) => {
            eprintln!("rebake error: {err}");
            std::process::exit(1);
        }
    }
}

async fn run_main() -> Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args).await
}
