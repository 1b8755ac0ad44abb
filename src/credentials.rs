//! Session parameter and temporary credential types.

use aws_smithy_types::DateTime;

/// Inputs for one session-token exchange, resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionParameters {
    /// ARN of the MFA device to authenticate against.
    pub mfa_device_arn: String,
    /// Current one-time code from the device.
    pub token_code: String,
    /// Requested session length. STS enforces the permitted range.
    pub duration_seconds: i32,
}

/// Temporary credentials returned by the identity service.
///
/// Immutable once received. Only the three key fields are persisted;
/// the expiration is reported to the operator.
#[derive(Debug, Clone)]
pub struct TemporaryCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: DateTime,
}
