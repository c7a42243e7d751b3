use std::process;

use tracing::info;
use wycheproof_rsa_cli::{
    cli_ensure, config::ClapConfig, error::CliError, run::run_files,
};
use wycheproof_rsa_crypto::reexport::openssl;
use wycheproof_rsa_logger::log_init;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Some(err) = main_().await.err() {
        eprintln!("ERROR: {err}");
        process::exit(1);
    }
}

async fn main_() -> Result<(), CliError> {
    let config = ClapConfig::load()?;
    if let Some(rust_log) = &config.rust_log {
        // SAFETY: no other thread is running yet
        unsafe {
            std::env::set_var("RUST_LOG", rust_log);
        }
    }
    log_init(None);
    info!(
        "OpenSSL version: {}, in {}, number: {:x}",
        openssl::version::version(),
        openssl::version::dir(),
        openssl::version::number()
    );

    let reports = run_files(&config).await?;
    for report in &reports {
        println!("{report}");
    }
    let failed = reports.iter().filter(|report| !report.is_success()).count();
    cli_ensure!(
        failed == 0,
        CliError::Failed {
            failed,
            total: reports.len(),
        }
    );
    Ok(())
}
