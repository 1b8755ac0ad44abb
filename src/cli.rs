//! Command-line interface definitions.

use std::path::PathBuf;

use clap::Parser;

/// AWS session credential refresher.
///
/// Exchanges an MFA one-time code for temporary session credentials via
/// STS `GetSessionToken` and rewrites the shared credentials file with a
/// single `[default]` profile. Any profiles in the previous file are
/// discarded.
#[derive(Parser)]
#[command(author, version, about)]
pub struct Args {
    /// ARN of the MFA device registered for the IAM user
    #[arg(long)]
    pub arn: String,

    /// One-time code from the authenticator device
    #[arg(long)]
    pub mfa: String,

    /// Session duration in seconds (STS accepts 900-129600)
    #[arg(
        long,
        env = "AWS_SESSION_DURATION",
        default_value = "21600",
        value_parser = clap::value_parser!(i32).range(1..)
    )]
    pub duration: i32,

    /// Path to AWS credentials file [default: ~/.aws/credentials]
    #[arg(short, long, env = "AWS_SHARED_CREDENTIALS_FILE")]
    pub credentials_path: Option<PathBuf>,
}
