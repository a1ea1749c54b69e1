// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::build_errors::Error as BuilderError;
use crate::constants::{GOOGLE_APPLICATION_CREDENTIALS_VAR, SERVICE_ACCOUNT_TYPE};
use crate::errors::CredentialsError;
use crate::{BuildResult, Result};
use rustls::crypto::{CryptoProvider, KeyProvider};
use rustls::SignatureScheme;
use rustls_pki_types::PrivateKeyDer;
use rustls_pki_types::pem::PemObject;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

/// A representation of a [service account key].
///
/// The key is parsed from the JSON document returned when the key is
/// created. Only the `type` field is validated when the key is parsed. The
/// private key and its id are validated the first time a [SigningKey] is
/// requested.
///
/// # Example
/// ```
/// # use google_cloud_service_account::credentials::service_account::ServiceAccountKey;
/// let key = ServiceAccountKey::from_value(serde_json::json!({
///     "type": "service_account",
///     "client_id": "123456789",
///     "client_email": "robot@my-project.iam.gserviceaccount.com",
///     "private_key_id": "test-key-id",
///     "private_key": "",
/// }))?;
/// assert_eq!(key.client_email(), "robot@my-project.iam.gserviceaccount.com");
/// assert!(key.signing_key().is_err());
/// # Ok::<(), google_cloud_service_account::build_errors::Error>(())
/// ```
///
/// [service account key]: https://cloud.google.com/iam/docs/keys-create-delete#creating
pub struct ServiceAccountKey {
    client_id: String,
    client_email: String,
    private_key: String,
    private_key_id: String,
    project_id: Option<String>,
    token_uri: Option<String>,
    // Derived on first use, at most once per key.
    signing_key: Mutex<Option<Arc<SigningKey>>>,
}

impl ServiceAccountKey {
    /// Parses a service account key from the bytes of a JSON document.
    pub fn from_json(contents: &[u8]) -> BuildResult<Self> {
        let value = serde_json::from_slice::<Value>(contents).map_err(BuilderError::parsing)?;
        Self::from_value(value)
    }

    /// Parses a service account key from a JSON value.
    ///
    /// Fails if the value is not an object, if the object is empty, or if
    /// its `type` field is missing or is not `service_account`.
    pub fn from_value(value: Value) -> BuildResult<Self> {
        let Value::Object(map) = value else {
            return Err(BuilderError::parsing(
                "the service account key must be a JSON object",
            ));
        };
        if map.is_empty() {
            return Err(BuilderError::empty());
        }
        match map.get("type") {
            None | Some(Value::Null) => return Err(BuilderError::missing_type()),
            Some(Value::String(t)) if t == SERVICE_ACCOUNT_TYPE => {}
            Some(other) => {
                return Err(BuilderError::unknown_type(
                    scalar(other).unwrap_or_else(|| other.to_string()),
                ));
            }
        }
        Ok(Self {
            client_id: string_field(&map, "client_id"),
            client_email: string_field(&map, "client_email"),
            private_key: string_field(&map, "private_key"),
            private_key_id: string_field(&map, "private_key_id"),
            project_id: optional_field(&map, "project_id"),
            token_uri: optional_field(&map, "token_uri"),
            signing_key: Mutex::new(None),
        })
    }

    /// Reads and parses a service account key file.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> BuildResult<Self> {
        let contents = tokio::fs::read(path.as_ref())
            .await
            .map_err(BuilderError::loading)?;
        Self::from_json(&contents)
    }

    /// Reads the key file named by the `GOOGLE_APPLICATION_CREDENTIALS`
    /// environment variable.
    pub async fn from_application_credentials() -> BuildResult<Self> {
        let path = std::env::var(GOOGLE_APPLICATION_CREDENTIALS_VAR).map_err(|e| {
            BuilderError::loading(format!("{GOOGLE_APPLICATION_CREDENTIALS_VAR}: {e}"))
        })?;
        Self::from_file(path).await
    }

    /// The unique id of the service account.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The email address of the service account, used as the assertion
    /// issuer.
    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    /// The PEM-encoded private key.
    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    /// The id of the private key, sent as the `kid` of the assertion header.
    pub fn private_key_id(&self) -> &str {
        &self.private_key_id
    }

    /// The project that owns the service account, if the document names one.
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// The token endpoint named in the document, if any.
    pub fn token_uri(&self) -> Option<&str> {
        self.token_uri.as_deref()
    }

    /// Returns the signing key for this service account key.
    ///
    /// The signing key is derived on the first successful call and the same
    /// value is returned on every later call. Concurrent first calls are
    /// serialized, so the derivation runs at most once. Failures are not
    /// cached.
    ///
    /// Fails with a [key unavailable][CredentialsError::is_key_unavailable]
    /// error if the private key or the private key id are empty, or if the
    /// private key cannot be used to create RS256 signatures.
    pub fn signing_key(&self) -> Result<Arc<SigningKey>> {
        let mut slot = self
            .signing_key
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(key) = slot.as_ref() {
            return Ok(key.clone());
        }
        let key = Arc::new(SigningKey::from_pem(
            &self.private_key,
            &self.private_key_id,
        )?);
        tracing::debug!(
            client_email = %self.client_email,
            key_id = %self.private_key_id,
            "derived service account signing key"
        );
        *slot = Some(key.clone());
        Ok(key)
    }
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_id", &self.client_id)
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"[censored]")
            .field("project_id", &self.project_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_field(map: &Map<String, Value>, name: &str) -> String {
    optional_field(map, name).unwrap_or_default()
}

fn optional_field(map: &Map<String, Value>, name: &str) -> Option<String> {
    map.get(name).and_then(scalar)
}

/// A key capable of producing RS256 signatures, derived from a
/// [ServiceAccountKey].
pub struct SigningKey {
    key_id: String,
    key: Arc<dyn rustls::sign::SigningKey>,
}

impl SigningKey {
    fn from_pem(pem: &str, key_id: &str) -> Result<Self> {
        if pem.is_empty() {
            return Err(CredentialsError::key_unavailable_from_str(
                "the service account key has an empty `private_key` field",
            ));
        }
        if key_id.is_empty() {
            return Err(CredentialsError::key_unavailable_from_str(
                "the service account key has an empty `private_key_id` field",
            ));
        }
        let der =
            PrivateKeyDer::from_pem_slice(pem.as_bytes()).map_err(CredentialsError::key_unavailable)?;
        let key = key_provider()?
            .load_private_key(der)
            .map_err(CredentialsError::key_unavailable)?;
        if key
            .choose_scheme(&[SignatureScheme::RSA_PKCS1_SHA256])
            .is_none()
        {
            return Err(CredentialsError::key_unavailable_from_str(
                "the private key cannot create RSA_PKCS1_SHA256 signatures",
            ));
        }
        Ok(Self {
            key_id: key_id.to_string(),
            key,
        })
    }

    /// The id of the private key, sent as the `kid` header of each
    /// assertion.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub(crate) fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        let signer = self
            .key
            .choose_scheme(&[SignatureScheme::RSA_PKCS1_SHA256])
            .ok_or_else(|| {
                CredentialsError::key_unavailable_from_str(
                    "the private key cannot create RSA_PKCS1_SHA256 signatures",
                )
            })?;
        signer.sign(message).map_err(CredentialsError::key_unavailable)
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("key_id", &self.key_id)
            .field("key", &"[censored]")
            .finish()
    }
}

fn key_provider() -> Result<&'static dyn KeyProvider> {
    CryptoProvider::get_default()
        .map(|p| p.key_provider)
        .or_else(fallback_key_provider)
        .ok_or_else(|| {
            CredentialsError::key_unavailable_from_str(
                "no rustls crypto provider is installed, call `rustls::crypto::CryptoProvider::install_default()`",
            )
        })
}

#[cfg(feature = "default-rustls-provider")]
fn fallback_key_provider() -> Option<&'static dyn KeyProvider> {
    Some(rustls::crypto::aws_lc_rs::default_provider().key_provider)
}

#[cfg(not(feature = "default-rustls-provider"))]
fn fallback_key_provider() -> Option<&'static dyn KeyProvider> {
    None
}
