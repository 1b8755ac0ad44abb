//! Session-token exchange against AWS STS.
//!
//! The outbound call authenticates with ambient credentials resolved by
//! `aws-config` from the environment and shared config files. The exchange
//! itself is behind the [`TokenExchange`] trait so the orchestrator can be
//! driven by a substitute implementation in tests.

use async_trait::async_trait;
use aws_sdk_sts::Client;
use aws_sdk_sts::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_sts::operation::get_session_token::GetSessionTokenError;
use log::info;
use thiserror::Error;

use crate::credentials::{SessionParameters, TemporaryCredentials};

/// Classified failure of a session-token request.
///
/// No variant is retried internally; every failure is returned to the
/// caller immediately. Only `TransportFailure` is worth retrying manually
/// without changing the inputs.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The account/region combination is not enabled for session tokens.
    #[error("session tokens are disabled in this region: {0}")]
    RegionDisabled(String),
    /// The device ARN, one-time code, or signing identity was rejected.
    #[error("MFA authentication failed: {0}")]
    AuthenticationFailed(String),
    /// The identity service could not be reached or did not respond.
    #[error("could not reach the identity service: {0}")]
    TransportFailure(String),
    /// Anything else, surfaced verbatim.
    #[error("session token request failed: {0}")]
    Unknown(String),
}

/// Issues temporary credentials for a set of session parameters.
#[async_trait]
pub trait TokenExchange: Send + Sync {
    async fn request_session_token(
        &self,
        params: &SessionParameters,
    ) -> Result<TemporaryCredentials, ExchangeError>;
}

/// STS-backed exchange using a client built from environment config.
pub struct StsTokenExchange {
    client: Client,
}

impl StsTokenExchange {
    pub async fn from_env() -> Self {
        let config = aws_config::from_env().load().await;
        Self {
            client: Client::new(&config),
        }
    }
}

#[async_trait]
impl TokenExchange for StsTokenExchange {
    async fn request_session_token(
        &self,
        params: &SessionParameters,
    ) -> Result<TemporaryCredentials, ExchangeError> {
        info!(
            "Requesting session token - Duration: {}s",
            params.duration_seconds
        );

        let output = self
            .client
            .get_session_token()
            .duration_seconds(params.duration_seconds)
            .serial_number(&params.mfa_device_arn)
            .token_code(&params.token_code)
            .send()
            .await
            .map_err(classify)?;

        let creds = output.credentials().ok_or_else(|| {
            ExchangeError::Unknown("response carried no credentials".to_string())
        })?;

        Ok(TemporaryCredentials {
            access_key_id: creds.access_key_id().to_string(),
            secret_access_key: creds.secret_access_key().to_string(),
            session_token: creds.session_token().to_string(),
            expiration: *creds.expiration(),
        })
    }
}

// STS reports a rejected or expired one-time code as AccessDenied rather
// than a dedicated error shape; the remaining codes cover a bad signing
// identity on the outbound request.
const AUTH_ERROR_CODES: &[&str] = &[
    "AccessDenied",
    "InvalidClientTokenId",
    "ExpiredToken",
    "SignatureDoesNotMatch",
    "IncompleteSignature",
];

fn classify(err: SdkError<GetSessionTokenError>) -> ExchangeError {
    match err {
        SdkError::ServiceError(context) => classify_service(context.into_err()),
        transport @ (SdkError::DispatchFailure(_)
        | SdkError::TimeoutError(_)
        | SdkError::ResponseError(_)) => {
            ExchangeError::TransportFailure(DisplayErrorContext(&transport).to_string())
        }
        other => ExchangeError::Unknown(DisplayErrorContext(&other).to_string()),
    }
}

fn classify_service(err: GetSessionTokenError) -> ExchangeError {
    let detail = DisplayErrorContext(&err).to_string();
    if err.is_region_disabled_exception() {
        ExchangeError::RegionDisabled(detail)
    } else if err.code().is_some_and(|code| AUTH_ERROR_CODES.contains(&code)) {
        ExchangeError::AuthenticationFailed(detail)
    } else {
        ExchangeError::Unknown(detail)
    }
}
