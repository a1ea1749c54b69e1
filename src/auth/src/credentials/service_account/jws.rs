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

use super::key::{ServiceAccountKey, SigningKey};
use crate::Result;
use crate::errors::CredentialsError;
use crate::token::GrantRequest;
use base64::prelude::{BASE64_URL_SAFE_NO_PAD, Engine as _};
use serde::Serialize;
use time::OffsetDateTime;

/// The claim set of a JWT-bearer assertion, see [RFC 7523].
///
/// [RFC 7523]: https://datatracker.ietf.org/doc/html/rfc7523#section-3
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct JwsClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    #[serde(with = "time::serde::timestamp")]
    pub exp: OffsetDateTime,
    #[serde(with = "time::serde::timestamp")]
    pub iat: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
}

impl JwsClaims {
    /// Builds the claims to exchange `key` for a token at `aud`.
    ///
    /// Time fields are whole seconds: `iat` is `now` truncated and `exp` is
    /// `iat` plus the whole seconds of the requested lifetime.
    pub fn new(
        key: &ServiceAccountKey,
        request: &GrantRequest,
        aud: &str,
        now: OffsetDateTime,
    ) -> Self {
        let iat = now - time::Duration::nanoseconds(now.nanosecond().into());
        let ttl = i64::try_from(request.ttl.as_secs()).unwrap_or(i64::MAX);
        let exp = iat.saturating_add(time::Duration::seconds(ttl));
        Self {
            iss: key.client_email().to_string(),
            scope: request.scope(),
            aud: aud.to_string(),
            exp,
            iat,
            sub: request.subject.clone().filter(|s| !s.is_empty()),
        }
    }

    pub fn encode(&self) -> Result<String> {
        if self.exp < self.iat {
            return Err(CredentialsError::token_request_from_str(
                false,
                format!(
                    "expiration time {:?}, must be later than issued time {:?}",
                    self.exp, self.iat
                ),
            ));
        }
        let json = serde_json::to_string(&self)
            .map_err(|e| CredentialsError::token_request(false, e))?;
        Ok(BASE64_URL_SAFE_NO_PAD.encode(json.as_bytes()))
    }

    /// Signs the claims, returning a compact JWS.
    pub fn sign(&self, key: &SigningKey) -> Result<String> {
        let header = JwsHeader {
            alg: "RS256",
            typ: "JWT",
            kid: key.key_id(),
        };
        let signing_input = format!("{}.{}", header.encode()?, self.encode()?);
        let signature = key.sign(signing_input.as_bytes())?;
        Ok(format!(
            "{signing_input}.{}",
            BASE64_URL_SAFE_NO_PAD.encode(signature)
        ))
    }
}

/// The header that describes who, what, and how a token was created.
#[derive(Serialize, Debug)]
struct JwsHeader<'a> {
    alg: &'a str,
    typ: &'a str,
    kid: &'a str,
}

impl JwsHeader<'_> {
    fn encode(&self) -> Result<String> {
        let json = serde_json::to_string(&self)
            .map_err(|e| CredentialsError::token_request(false, e))?;
        Ok(BASE64_URL_SAFE_NO_PAD.encode(json.as_bytes()))
    }
}
