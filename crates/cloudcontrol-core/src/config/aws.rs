//! AWS client configuration.
//!
//! Holds the region, credential source and SDK client tuning used to build
//! the CloudControl and CloudFormation clients. The structure is read once at
//! process start and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for the AWS SDK clients.
#[derive(Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    /// Target region.
    #[serde(default = "default_region")]
    pub region: String,

    /// Named profile from the shared config/credentials files.
    #[serde(default)]
    pub profile: Option<String>,

    /// Explicit access key id.
    #[serde(default)]
    pub access_key_id: Option<String>,

    /// Explicit secret access key.
    #[serde(default)]
    pub secret_access_key: Option<String>,

    /// Session token accompanying temporary explicit credentials.
    #[serde(default)]
    pub session_token: Option<String>,

    /// Override for the service endpoint (LocalStack and similar).
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// TCP connect timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Socket read timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub read_timeout_secs: u64,

    /// Maximum attempts (initial call included) of the SDK standard retry policy.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

/// Where the SDK clients get their credentials from.
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Explicit access key triple.
    Static {
        access_key_id: String,
        secret_access_key: String,
        session_token: Option<String>,
    },
    /// Named profile.
    Profile(String),
    /// The SDK default provider chain.
    DefaultChain,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            profile: None,
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
            endpoint_url: None,
            connect_timeout_secs: default_timeout_secs(),
            read_timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl AwsConfig {
    /// Resolve the credential source.
    ///
    /// A complete explicit key pair takes precedence over a profile, and a
    /// profile takes precedence over the default chain. A partial key pair is
    /// ignored.
    pub fn credential_source(&self) -> CredentialSource {
        match (non_blank(&self.access_key_id), non_blank(&self.secret_access_key)) {
            (Some(access_key_id), Some(secret_access_key)) => {
                return CredentialSource::Static {
                    access_key_id: access_key_id.to_string(),
                    secret_access_key: secret_access_key.to_string(),
                    session_token: non_blank(&self.session_token).map(str::to_string),
                };
            }
            (Some(_), None) | (None, Some(_)) => {
                tracing::warn!(
                    "Only one of access_key_id / secret_access_key is set; ignoring explicit credentials"
                );
            }
            (None, None) => {}
        }

        match non_blank(&self.profile) {
            Some(profile) => CredentialSource::Profile(profile.to_string()),
            None => CredentialSource::DefaultChain,
        }
    }
}

impl fmt::Debug for AwsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsConfig")
            .field("region", &self.region)
            .field("profile", &self.profile)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &redacted(&self.secret_access_key))
            .field("session_token", &redacted(&self.session_token))
            .field("endpoint_url", &self.endpoint_url)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("read_timeout_secs", &self.read_timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Static { access_key_id, .. } => f
                .debug_struct("Static")
                .field("access_key_id", access_key_id)
                .finish_non_exhaustive(),
            CredentialSource::Profile(name) => f.debug_tuple("Profile").field(name).finish(),
            CredentialSource::DefaultChain => f.write_str("DefaultChain"),
        }
    }
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Static { .. } => f.write_str("static"),
            CredentialSource::Profile(name) => write!(f, "profile:{}", name),
            CredentialSource::DefaultChain => f.write_str("default-chain"),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn redacted(value: &Option<String>) -> Option<&'static str> {
    value.as_ref().map(|_| "<redacted>")
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_max_attempts() -> u32 {
    3
}
