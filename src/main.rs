//! AWS session credential refresher.
//!
//! Exchanges an MFA one-time code for temporary session credentials via
//! STS `GetSessionToken` and writes them to the shared credentials file:
//!
//! 1. Parses command-line arguments into immutable session parameters
//! 2. Removes any previous credentials file
//! 3. Requests a session token from STS, authenticated with ambient
//!    credentials resolved from the environment
//! 4. Writes the `[default]` profile and reports the expiration

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use log::info;

mod cli;
mod credentials;
mod store;
mod sts;
mod updater;

use cli::Args;
use credentials::SessionParameters;
use sts::StsTokenExchange;
use updater::CredentialRefresher;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let Args {
        arn,
        mfa,
        duration,
        credentials_path,
    } = Args::parse();

    let params = SessionParameters {
        mfa_device_arn: arn,
        token_code: mfa,
        duration_seconds: duration,
    };

    let exchange = Arc::new(StsTokenExchange::from_env().await);
    let refresher = CredentialRefresher::new(credentials_path, exchange)?;

    let expiration = refresher.refresh(&params).await?;
    info!("Updated AWS credentials, valid until {expiration}");

    Ok(())
}
