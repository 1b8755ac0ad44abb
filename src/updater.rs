//! Orchestration of one credential refresh run.
//!
//! A run walks a fixed sequence: clear the previous credentials file,
//! exchange the MFA code for temporary credentials, write the new file.
//! Every failure aborts the run; nothing is rolled back. After a cleared
//! file and a failed exchange the file simply stays absent, which is a
//! safe state for downstream consumers.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use aws_smithy_types::date_time::Format;
use log::info;

use crate::credentials::SessionParameters;
use crate::store;
use crate::sts::TokenExchange;

pub struct CredentialRefresher {
    path: PathBuf,
    exchange: Arc<dyn TokenExchange>,
}

impl CredentialRefresher {
    /// Resolves the credentials file path and wires in the exchange
    /// implementation. `path` overrides the default `~/.aws/credentials`.
    pub fn new(path: Option<PathBuf>, exchange: Arc<dyn TokenExchange>) -> Result<Self> {
        let path = path
            .or_else(store::default_path)
            .context("could not determine home directory")?;
        Ok(Self { path, exchange })
    }

    /// Runs clear, exchange, write. Returns the expiration timestamp of
    /// the new credentials for operator reporting.
    pub async fn refresh(&self, params: &SessionParameters) -> Result<String> {
        store::clear(&self.path).await.with_context(|| {
            format!(
                "failed to remove previous credentials file {}",
                self.path.display()
            )
        })?;

        let creds = self.exchange.request_session_token(params).await?;
        info!("Acquired session token");

        store::write(&self.path, &creds).await.with_context(|| {
            format!("failed to write credentials file {}", self.path.display())
        })?;

        let expiration = creds
            .expiration
            .fmt(Format::DateTime)
            .context("identity service returned an unformattable expiration")?;
        info!("Credentials expire at: {expiration}");

        Ok(expiration)
    }
}
