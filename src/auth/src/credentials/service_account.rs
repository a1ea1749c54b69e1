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

//! [Service Account] authorization grants.
//!
//! A service account is an account for an application or compute workload
//! instead of an individual end user. When you create a [service account key]
//! the key is returned as a JSON document, in the format described by
//! [aip/4112]. This document contains an id for the service account, as well
//! as the cryptographic material (an RSA private key) required to
//! authenticate the caller.
//!
//! Therefore, service account keys should be treated as any other secret
//! with security implications. Think of them as unencrypted passwords. Do not
//! store them where unauthorized persons or programs may read them.
//!
//! The types in this module sign a [JWT-bearer assertion] with the private
//! key and exchange it for an access token at the token endpoint.
//!
//! Example usage:
//!
//! ```no_run
//! # use google_cloud_service_account::credentials::service_account::Builder;
//! # use google_cloud_service_account::token::GrantRequest;
//! # tokio_test::block_on(async {
//! let key = serde_json::json!({
//!     "type": "service_account",
//!     "client_email": "robot@my-project.iam.gserviceaccount.com",
//!     "private_key_id": "test-private-key-id",
//!     "private_key": "", // <-- Provide a valid PEM key here
//! });
//! let client = Builder::new(key).build()?;
//! let token = client
//!     .request_authorization_grant(GrantRequest::new(["https://www.googleapis.com/auth/cloud-platform"]))
//!     .await?;
//! println!("Token: {token:?}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # });
//! ```
//!
//! [aip/4112]: https://google.aip.dev/auth/4112
//! [JWT-bearer assertion]: https://datatracker.ietf.org/doc/html/rfc7523
//! [Service Account]: https://cloud.google.com/iam/docs/service-account-creds
//! [service account key]: https://cloud.google.com/iam/docs/keys-create-delete#creating

pub(crate) mod jws;
mod key;

pub use key::{ServiceAccountKey, SigningKey};

use crate::metadata::AuthorizationServerMetadata;
use crate::oauth2::{self, RevocationStatus, TokenTypeHint};
use crate::token::{AccessToken, GrantRequest, TokenExchange};
use crate::{BuildResult, Result};
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug)]
enum KeySource {
    Json(Value),
    Key(ServiceAccountKey),
}

/// A builder for [ServiceAccountClient].
///
/// # Example
/// ```
/// # use google_cloud_service_account::credentials::service_account::Builder;
/// let key = serde_json::json!({
///     "type": "service_account",
///     "client_id": "123456789",
///     "client_email": "robot@my-project.iam.gserviceaccount.com",
///     "private_key_id": "test-private-key-id",
///     "private_key": "",
///     "token_uri": "https://oauth2.example.com/token",
/// });
/// let client = Builder::new(key)
///     .with_token_uri("https://private.oauth2.example.com/token")
///     .build()?;
/// assert_eq!(client.client_id(), "123456789");
/// # Ok::<(), google_cloud_service_account::build_errors::Error>(())
/// ```
#[derive(Debug)]
pub struct Builder {
    key: KeySource,
    client: oauth2::Builder,
}

impl Builder {
    /// Creates a builder from the JSON document of a service account key.
    ///
    /// The document is validated by [build][Builder::build].
    pub fn new(service_account_key: Value) -> Self {
        Self {
            key: KeySource::Json(service_account_key),
            client: oauth2::Builder::default(),
        }
    }

    /// Creates a builder from a parsed service account key.
    pub fn from_key(service_account_key: ServiceAccountKey) -> Self {
        Self {
            key: KeySource::Key(service_account_key),
            client: oauth2::Builder::default(),
        }
    }

    /// Overrides the token endpoint.
    ///
    /// This takes precedence over the `token_uri` field in the service
    /// account key.
    pub fn with_token_uri<S: Into<String>>(mut self, token_uri: S) -> Self {
        self.client = self.client.with_token_endpoint(token_uri);
        self
    }

    pub fn with_revocation_uri<S: Into<String>>(mut self, revocation_uri: S) -> Self {
        self.client = self.client.with_revocation_endpoint(revocation_uri);
        self
    }

    pub fn with_metadata(mut self, metadata: AuthorizationServerMetadata) -> Self {
        self.client = self.client.with_metadata(metadata);
        self
    }

    /// Sets the HTTP client used to send requests.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = self.client.with_http_client(client);
        self
    }

    /// Returns a [ServiceAccountClient] with the configured settings.
    ///
    /// Fails if the service account key document is invalid, see
    /// [ServiceAccountKey::from_value].
    pub fn build(self) -> BuildResult<ServiceAccountClient> {
        let key = match self.key {
            KeySource::Json(value) => ServiceAccountKey::from_value(value)?,
            KeySource::Key(key) => key,
        };
        Ok(ServiceAccountClient {
            key: Arc::new(key),
            client: self.client.build(),
        })
    }
}

/// Requests access tokens on behalf of a service account.
///
/// Clones share the service account key, and therefore its signing key.
#[derive(Clone, Debug)]
pub struct ServiceAccountClient {
    key: Arc<ServiceAccountKey>,
    client: oauth2::Client,
}

impl ServiceAccountClient {
    pub fn key(&self) -> &ServiceAccountKey {
        &self.key
    }

    pub fn client_id(&self) -> &str {
        self.key.client_id()
    }

    pub fn client(&self) -> &oauth2::Client {
        &self.client
    }

    /// Exchanges a signed assertion for an access token.
    ///
    /// Each call performs one request to the token endpoint.
    pub async fn request_authorization_grant(&self, request: GrantRequest) -> Result<AccessToken> {
        self.client.exchange(&self.key, &request).await
    }

    /// Revokes the token held in `slot`, see [oauth2::Client::revoke].
    pub async fn revoke(
        &self,
        slot: &mut Option<AccessToken>,
        hint: Option<TokenTypeHint>,
    ) -> RevocationStatus {
        self.client.revoke(slot, hint).await
    }
}

#[async_trait::async_trait]
impl TokenExchange for ServiceAccountClient {
    async fn exchange(&self, request: GrantRequest) -> Result<AccessToken> {
        self.request_authorization_grant(request).await
    }
}
