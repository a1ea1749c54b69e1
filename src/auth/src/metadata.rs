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

//! Authorization server metadata, see [RFC 8414].
//!
//! [RFC 8414]: https://datatracker.ietf.org/doc/html/rfc8414

use crate::constants::{
    GOOGLE_AUTHORIZATION_ENDPOINT, GOOGLE_ISSUER, GOOGLE_JWKS_URI, GOOGLE_REVOCATION_ENDPOINT,
    GOOGLE_TOKEN_ENDPOINT,
};
use serde::{Deserialize, Serialize};

/// The endpoints and capabilities of an OAuth 2.0 authorization server.
///
/// Only the token and revocation endpoints are used by this crate. The
/// remaining fields are carried so applications can inspect or serialize the
/// metadata of a provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationServerMetadata {
    pub issuer: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub revocation_endpoint: String,
    pub jwks_uri: String,
    #[serde(default)]
    pub token_endpoint_auth_methods_supported: Vec<String>,
}

impl AuthorizationServerMetadata {
    /// The metadata for Google's authorization server.
    pub fn google() -> Self {
        Self {
            issuer: GOOGLE_ISSUER.to_string(),
            authorization_endpoint: GOOGLE_AUTHORIZATION_ENDPOINT.to_string(),
            token_endpoint: GOOGLE_TOKEN_ENDPOINT.to_string(),
            revocation_endpoint: GOOGLE_REVOCATION_ENDPOINT.to_string(),
            jwks_uri: GOOGLE_JWKS_URI.to_string(),
            token_endpoint_auth_methods_supported: vec![
                "client_secret_post".to_string(),
                "client_secret_basic".to_string(),
            ],
        }
    }
}

impl Default for AuthorizationServerMetadata {
    fn default() -> Self {
        Self::google()
    }
}
