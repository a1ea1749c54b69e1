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

//! An OAuth 2.0 client for the [JWT-bearer grant] and [token revocation].
//!
//! The [Client] sends a single request per operation. It does not cache
//! tokens and it does not retry failed requests. Applications that need
//! either should wrap the client.
//!
//! [JWT-bearer grant]: https://datatracker.ietf.org/doc/html/rfc7523
//! [token revocation]: https://datatracker.ietf.org/doc/html/rfc7009

use crate::Result;
use crate::constants::JWT_BEARER_GRANT_TYPE;
use crate::credentials::service_account::ServiceAccountKey;
use crate::credentials::service_account::jws::JwsClaims;
use crate::errors::CredentialsError;
use crate::metadata::AuthorizationServerMetadata;
use crate::token::{AccessToken, GrantRequest};
use serde::Deserialize;
use time::OffsetDateTime;

/// The successful response from a token endpoint, see [RFC 6749].
///
/// [RFC 6749]: https://datatracker.ietf.org/doc/html/rfc6749#section-5.1
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// The kind of token being revoked, see [RFC 7009].
///
/// [RFC 7009]: https://datatracker.ietf.org/doc/html/rfc7009#section-2.1
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenTypeHint {
    AccessToken,
    RefreshToken,
}

impl TokenTypeHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessToken => "access_token",
            Self::RefreshToken => "refresh_token",
        }
    }
}

impl std::fmt::Display for TokenTypeHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of a revocation.
///
/// Revoking a token always invalidates it locally, the token is consumed (or
/// removed from its slot) before the remote call is made. The remote
/// confirmation is informational: [is_revoked][RevocationStatus::is_revoked]
/// is always `true`, while [is_confirmed][RevocationStatus::is_confirmed]
/// reports whether the authorization server accepted the request.
#[derive(Clone, Debug)]
pub struct RevocationStatus {
    confirmed: bool,
    error: Option<CredentialsError>,
}

impl RevocationStatus {
    fn confirmed() -> Self {
        Self {
            confirmed: true,
            error: None,
        }
    }

    fn unconfirmed(error: Option<CredentialsError>) -> Self {
        Self {
            confirmed: false,
            error,
        }
    }

    /// The token is no longer held by the caller.
    pub fn is_revoked(&self) -> bool {
        true
    }

    /// The authorization server acknowledged the revocation.
    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    /// The error from the remote revocation call, if any.
    pub fn error(&self) -> Option<&CredentialsError> {
        self.error.as_ref()
    }
}

/// A builder for [Client].
///
/// # Example
/// ```
/// # use google_cloud_service_account::oauth2::Builder;
/// let client = Builder::default()
///     .with_token_endpoint("https://oauth2.example.com/token")
///     .build();
/// assert_eq!(client.revocation_endpoint(), "https://accounts.google.com/o/oauth2/revoke");
/// ```
#[derive(Debug, Default)]
pub struct Builder {
    metadata: Option<AuthorizationServerMetadata>,
    token_endpoint: Option<String>,
    revocation_endpoint: Option<String>,
    http_client: Option<reqwest::Client>,
}

impl Builder {
    /// Sets the authorization server metadata.
    ///
    /// Defaults to [AuthorizationServerMetadata::google].
    pub fn with_metadata(mut self, metadata: AuthorizationServerMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Overrides the token endpoint.
    ///
    /// The token endpoint is, in order of precedence, the value set here,
    /// the `token_uri` field of the service account key, or the token
    /// endpoint in the metadata.
    pub fn with_token_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.token_endpoint = Some(endpoint.into());
        self
    }

    /// Overrides the revocation endpoint in the metadata.
    pub fn with_revocation_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.revocation_endpoint = Some(endpoint.into());
        self
    }

    /// Sets the HTTP client used to send requests.
    ///
    /// Use this to configure timeouts, proxies, or connection pools.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn build(self) -> Client {
        let metadata = self.metadata.unwrap_or_default();
        let revocation_endpoint = self
            .revocation_endpoint
            .unwrap_or_else(|| metadata.revocation_endpoint.clone());
        Client {
            http: self.http_client.unwrap_or_default(),
            metadata,
            token_endpoint: self.token_endpoint,
            revocation_endpoint,
        }
    }
}

/// Exchanges service account keys for access tokens, and revokes them.
#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
    metadata: AuthorizationServerMetadata,
    token_endpoint: Option<String>,
    revocation_endpoint: String,
}

impl Client {
    /// Creates a client for Google's authorization server.
    pub fn new() -> Self {
        Builder::default().build()
    }

    pub fn metadata(&self) -> &AuthorizationServerMetadata {
        &self.metadata
    }

    /// The token endpoint used for `key`, also used as the assertion
    /// audience.
    pub fn token_endpoint<'a>(&'a self, key: &'a ServiceAccountKey) -> &'a str {
        self.token_endpoint
            .as_deref()
            .or(key.token_uri())
            .unwrap_or(&self.metadata.token_endpoint)
    }

    pub fn revocation_endpoint(&self) -> &str {
        &self.revocation_endpoint
    }

    /// Exchanges a signed assertion for an access token.
    ///
    /// The signing key is derived before anything else, a key that is not
    /// available fails without contacting the token endpoint. On success the
    /// token carries the scope returned by the server, or the requested scope
    /// if the server returns none.
    pub async fn exchange(
        &self,
        key: &ServiceAccountKey,
        request: &GrantRequest,
    ) -> Result<AccessToken> {
        let signing_key = key.signing_key()?;
        let endpoint = self.token_endpoint(key);
        let claims = JwsClaims::new(key, request, endpoint, OffsetDateTime::now_utc());
        let assertion = claims.sign(&signing_key)?;

        tracing::debug!(endpoint, scope = %claims.scope, "requesting access token");
        let response = self
            .http
            .post(endpoint)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT_TYPE),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|e| CredentialsError::token_request(!e.is_builder(), e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CredentialsError::token_request(!e.is_decode(), e.without_url()))?;
        if !status.is_success() {
            return Err(CredentialsError::token_response(
                status,
                body,
                format!("the token endpoint returned status {status}"),
            ));
        }
        if body.trim().is_empty() {
            return Err(CredentialsError::token_response(
                status,
                body,
                "the token endpoint returned an empty response",
            ));
        }
        let response = match serde_json::from_str::<TokenResponse>(&body) {
            Ok(r) => r,
            Err(e) => {
                return Err(CredentialsError::token_response(
                    status,
                    body,
                    format!("cannot parse the token endpoint response: {e}"),
                ));
            }
        };
        if response.access_token.is_empty() {
            return Err(CredentialsError::token_response(
                status,
                body,
                "the token endpoint response has an empty `access_token`",
            ));
        }

        let expires_at = match response.expires_in {
            Some(secs) => claims
                .iat
                .saturating_add(time::Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX))),
            None => claims.exp,
        };
        let scope = response
            .scope
            .filter(|s| !s.is_empty())
            .unwrap_or(claims.scope);
        tracing::debug!(endpoint, scope = %scope, %expires_at, "access token issued");
        Ok(AccessToken {
            token: response.access_token,
            token_type: response.token_type,
            scope,
            expires_at,
        })
    }

    /// Builds, without sending, the request to revoke `token`.
    pub fn revocation_request(
        &self,
        token: &str,
        hint: Option<TokenTypeHint>,
    ) -> Result<reqwest::Request> {
        let mut query = vec![("token", token)];
        if let Some(h) = hint {
            query.push(("token_type_hint", h.as_str()));
        }
        self.http
            .get(&self.revocation_endpoint)
            .query(&query)
            .build()
            .map_err(|e| CredentialsError::revocation(false, e.without_url()))
    }

    /// Revokes `token`.
    ///
    /// The token is consumed, it is invalid locally whatever the outcome of
    /// the remote call. Errors and logs never include the request URL, as it
    /// carries the token.
    pub async fn revoke_token(
        &self,
        token: AccessToken,
        hint: Option<TokenTypeHint>,
    ) -> RevocationStatus {
        let request = match self.revocation_request(&token.token, hint) {
            Ok(r) => r,
            Err(e) => return self.unconfirmed(e),
        };
        drop(token);

        let response = match self.http.execute(request).await {
            Ok(r) => r,
            Err(e) => {
                return self.unconfirmed(CredentialsError::revocation(
                    !e.is_builder(),
                    e.without_url(),
                ));
            }
        };
        let status = response.status();
        if status.is_success() {
            tracing::debug!(endpoint = %self.revocation_endpoint, "access token revoked");
            return RevocationStatus::confirmed();
        }
        match response.text().await {
            Ok(body) => self.unconfirmed(CredentialsError::revocation_response(status, body)),
            Err(e) => {
                let e = e.without_url();
                tracing::debug!(%status, "cannot read the revocation endpoint response: {e}");
                self.unconfirmed(CredentialsError::revocation_unreadable(status, e))
            }
        }
    }

    /// Revokes the token held in `slot`, if any.
    ///
    /// The slot is always empty when this function returns. An empty slot
    /// makes no network request.
    pub async fn revoke(
        &self,
        slot: &mut Option<AccessToken>,
        hint: Option<TokenTypeHint>,
    ) -> RevocationStatus {
        match slot.take() {
            Some(token) => self.revoke_token(token, hint).await,
            None => RevocationStatus::unconfirmed(None),
        }
    }

    fn unconfirmed(&self, error: CredentialsError) -> RevocationStatus {
        tracing::warn!(
            endpoint = %self.revocation_endpoint,
            "remote token revocation failed, the token is discarded locally: {error}"
        );
        RevocationStatus::unconfirmed(Some(error))
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::tests::service_account_json;
    use crate::token::tests::test_token;
    use http::StatusCode;
    use httptest::{
        Expectation, Server,
        matchers::{all_of, any, contains, request, url_decoded},
        responders::*,
    };
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use test_case::test_case;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    fn test_key() -> ServiceAccountKey {
        ServiceAccountKey::from_value(service_account_json()).expect("test key should parse")
    }

    fn test_client(server: &Server) -> Client {
        Builder::default()
            .with_token_endpoint(server.url("/token").to_string())
            .with_revocation_endpoint(server.url("/revoke").to_string())
            .build()
    }

    fn expect_token_request(server: &Server, status: u16, body: &str) {
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/token"),
                request::body(url_decoded(contains(("grant_type", JWT_BEARER_GRANT_TYPE)))),
                request::body(url_decoded(contains(("assertion", any())))),
            ])
            .times(1)
            .respond_with(status_code(status).body(body.to_string())),
        );
    }

    #[test]
    fn token_response() -> TestResult {
        let got = serde_json::from_value::<TokenResponse>(json!({
            "access_token": "abc",
            "token_type": "Bearer",
        }))?;
        assert_eq!(got.expires_in, None);
        assert_eq!(got.scope, None);

        let got = serde_json::from_value::<TokenResponse>(json!({
            "access_token": "abc",
            "token_type": "Bearer",
            "expires_in": 3599,
            "scope": "s1",
            "id_token": "ignored",
        }))?;
        assert_eq!(got.expires_in, Some(3599));
        assert_eq!(got.scope.as_deref(), Some("s1"));
        Ok(())
    }

    #[test]
    fn token_type_hint() {
        assert_eq!(TokenTypeHint::AccessToken.as_str(), "access_token");
        assert_eq!(TokenTypeHint::RefreshToken.to_string(), "refresh_token");
    }

    #[test]
    fn endpoints() -> TestResult {
        let client = Client::new();
        let key = test_key();
        assert_eq!(client.metadata(), &AuthorizationServerMetadata::google());
        assert_eq!(
            client.token_endpoint(&key),
            "https://oauth2.googleapis.com/token"
        );
        assert_eq!(
            client.revocation_endpoint(),
            "https://accounts.google.com/o/oauth2/revoke"
        );

        let mut value = service_account_json();
        value["token_uri"] = Value::from("https://from-key.example.com/token");
        let key = ServiceAccountKey::from_value(value)?;
        assert_eq!(
            client.token_endpoint(&key),
            "https://from-key.example.com/token"
        );

        let client = Builder::default()
            .with_token_endpoint("https://override.example.com/token")
            .build();
        assert_eq!(
            client.token_endpoint(&key),
            "https://override.example.com/token"
        );
        Ok(())
    }

    #[test]
    fn endpoints_from_metadata() {
        let metadata = AuthorizationServerMetadata {
            token_endpoint: "https://issuer.example.com/token".to_string(),
            revocation_endpoint: "https://issuer.example.com/revoke".to_string(),
            ..AuthorizationServerMetadata::google()
        };
        let client = Builder::default().with_metadata(metadata).build();
        assert_eq!(
            client.token_endpoint(&test_key()),
            "https://issuer.example.com/token"
        );
        assert_eq!(
            client.revocation_endpoint(),
            "https://issuer.example.com/revoke"
        );
    }

    #[tokio::test]
    async fn exchange_backfills_scope() -> TestResult {
        let server = Server::run();
        expect_token_request(
            &server,
            200,
            r#"{"access_token":"abc","token_type":"Bearer","expires_in":3600}"#,
        );
        let client = test_client(&server);

        let start = OffsetDateTime::now_utc();
        let token = client
            .exchange(&test_key(), &GrantRequest::new(["s1", "s2"]))
            .await?;
        assert_eq!(token.token, "abc");
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.scope, "s1 s2");
        assert!(token.expires_at <= start + Duration::from_secs(3601), "{token:?}");
        assert!(token.expires_at >= start + Duration::from_secs(3599), "{token:?}");
        Ok(())
    }

    #[test_case(r#"{"access_token":"abc","token_type":"Bearer","expires_in":3600,"scope":""}"#, "s1 s2"; "empty")]
    #[test_case(r#"{"access_token":"abc","token_type":"Bearer","expires_in":3600,"scope":"s1"}"#, "s1"; "echoed")]
    #[tokio::test]
    async fn exchange_scope(body: &str, want: &str) -> TestResult {
        let server = Server::run();
        expect_token_request(&server, 200, body);
        let client = test_client(&server);
        let token = client
            .exchange(&test_key(), &GrantRequest::new(["s1", "s2"]))
            .await?;
        assert_eq!(token.scope, want);
        Ok(())
    }

    #[tokio::test]
    async fn exchange_without_expires_in() -> TestResult {
        let server = Server::run();
        expect_token_request(&server, 200, r#"{"access_token":"abc","token_type":"Bearer"}"#);
        let client = test_client(&server);

        let start = OffsetDateTime::now_utc();
        let request = GrantRequest::new(["s1"]).with_ttl(Duration::from_secs(600));
        let token = client.exchange(&test_key(), &request).await?;
        assert!(token.expires_at <= start + Duration::from_secs(601), "{token:?}");
        assert!(token.expires_at >= start + Duration::from_secs(599), "{token:?}");
        Ok(())
    }

    #[tokio::test]
    async fn exchange_uses_key_token_uri() -> TestResult {
        let server = Server::run();
        expect_token_request(&server, 200, r#"{"access_token":"abc","token_type":"Bearer"}"#);
        let client = Builder::default().build();

        let mut value = service_account_json();
        value["token_uri"] = Value::from(server.url("/token").to_string());
        let key = ServiceAccountKey::from_value(value)?;
        let token = client.exchange(&key, &GrantRequest::new(["s1"])).await?;
        assert_eq!(token.token, "abc");
        Ok(())
    }

    #[test_case(400, false)]
    #[test_case(401, false)]
    #[test_case(500, true)]
    #[test_case(503, true)]
    #[tokio::test]
    async fn exchange_http_error(status: u16, transient: bool) -> TestResult {
        let server = Server::run();
        expect_token_request(&server, status, r#"{"error":"invalid_grant"}"#);
        let client = test_client(&server);

        let err = client
            .exchange(&test_key(), &GrantRequest::new(["s1"]))
            .await
            .unwrap_err();
        assert!(err.is_token_request_failed(), "{err:?}");
        assert_eq!(err.is_transient(), transient, "{err:?}");
        assert_eq!(err.http_status(), Some(StatusCode::from_u16(status)?));
        assert_eq!(err.response_body(), Some(r#"{"error":"invalid_grant"}"#));
        Ok(())
    }

    #[test_case(""; "empty body")]
    #[test_case("  \n"; "blank body")]
    #[test_case("not json"; "not json")]
    #[test_case(r#"{"token_type":"Bearer"}"#; "missing access_token")]
    #[test_case(r#"{"access_token":"","token_type":"Bearer"}"#; "empty access_token")]
    #[test_case(r#"{"access_token":"abc"}"#; "missing token_type")]
    #[test_case(r#"{"access_token":"abc","token_type":"Bearer","expires_in":"soon"}"#; "bad expires_in")]
    #[tokio::test]
    async fn exchange_bad_response(body: &str) -> TestResult {
        let server = Server::run();
        expect_token_request(&server, 200, body);
        let client = test_client(&server);

        let err = client
            .exchange(&test_key(), &GrantRequest::new(["s1"]))
            .await
            .unwrap_err();
        assert!(err.is_token_request_failed(), "{err:?}");
        assert!(!err.is_transient(), "{err:?}");
        assert_eq!(err.http_status(), Some(StatusCode::OK));
        assert_eq!(err.response_body(), Some(body));
        Ok(())
    }

    #[tokio::test]
    async fn exchange_key_unavailable() -> TestResult {
        // No expectations, any request fails the test.
        let server = Server::run();
        let client = test_client(&server);

        let mut value = service_account_json();
        value["private_key"] = Value::from("");
        let key = ServiceAccountKey::from_value(value)?;
        let err = client
            .exchange(&key, &GrantRequest::new(["s1"]))
            .await
            .unwrap_err();
        assert!(err.is_key_unavailable(), "{err:?}");
        assert!(err.http_status().is_none(), "{err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn exchange_unreachable() -> TestResult {
        let client = Builder::default()
            .with_token_endpoint("http://127.0.0.1:1/token")
            .build();
        let err = client
            .exchange(&test_key(), &GrantRequest::new(["s1"]))
            .await
            .unwrap_err();
        assert!(err.is_token_request_failed(), "{err:?}");
        assert!(err.is_transient(), "{err:?}");
        assert!(err.http_status().is_none(), "{err:?}");
        Ok(())
    }

    #[test_case(None, None)]
    #[test_case(Some(TokenTypeHint::AccessToken), Some("access_token"))]
    #[test_case(Some(TokenTypeHint::RefreshToken), Some("refresh_token"))]
    fn revocation_request(hint: Option<TokenTypeHint>, want: Option<&str>) -> TestResult {
        let client = Client::new();
        let request = client.revocation_request("token-test-only", hint)?;
        assert_eq!(request.method(), &reqwest::Method::GET);
        assert_eq!(request.url().path(), "/o/oauth2/revoke");
        let query = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<Vec<_>>();
        assert!(
            query.contains(&("token".to_string(), "token-test-only".to_string())),
            "{query:?}"
        );
        let got = query
            .iter()
            .find(|(k, _)| k == "token_type_hint")
            .map(|(_, v)| v.as_str());
        assert_eq!(got, want);
        Ok(())
    }

    #[tokio::test]
    async fn revoke_confirmed() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/revoke"),
                request::query(url_decoded(contains(("token", "token-test-only")))),
                request::query(url_decoded(contains(("token_type_hint", "access_token")))),
            ])
            .times(1)
            .respond_with(status_code(200)),
        );
        let client = test_client(&server);

        let mut slot = Some(test_token("s1"));
        let status = client
            .revoke(&mut slot, Some(TokenTypeHint::AccessToken))
            .await;
        assert!(slot.is_none(), "{slot:?}");
        assert!(status.is_revoked(), "{status:?}");
        assert!(status.is_confirmed(), "{status:?}");
        assert!(status.error().is_none(), "{status:?}");
        Ok(())
    }

    #[test_case(400, false)]
    #[test_case(500, true)]
    #[tokio::test]
    async fn revoke_rejected(code: u16, transient: bool) -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/revoke"))
                .times(1)
                .respond_with(status_code(code).body("invalid_token")),
        );
        let client = test_client(&server);

        let mut slot = Some(test_token("s1"));
        let status = client.revoke(&mut slot, None).await;
        assert!(slot.is_none(), "{slot:?}");
        assert!(status.is_revoked(), "{status:?}");
        assert!(!status.is_confirmed(), "{status:?}");
        let err = status.error().expect("rejected revocations report an error");
        assert!(err.is_revocation_failed(), "{err:?}");
        assert_eq!(err.is_transient(), transient, "{err:?}");
        assert_eq!(err.http_status(), Some(StatusCode::from_u16(code)?));
        assert_eq!(err.response_body(), Some("invalid_token"));
        Ok(())
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().expect("log buffer lock")).into_owned()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("log buffer lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();
        (logs, tracing::subscriber::set_default(subscriber))
    }

    #[tokio::test]
    async fn revoke_unreachable() {
        let (logs, _guard) = capture_logs();
        let client = Builder::default()
            .with_revocation_endpoint("http://127.0.0.1:1/revoke")
            .build();

        let mut slot = Some(test_token("s1"));
        let status = client.revoke(&mut slot, None).await;
        assert!(slot.is_none(), "{slot:?}");
        assert!(status.is_revoked(), "{status:?}");
        assert!(!status.is_confirmed(), "{status:?}");
        let err = status.error().expect("network failures report an error");
        assert!(err.is_revocation_failed(), "{err:?}");
        assert!(err.is_transient(), "{err:?}");

        let got = format!("{err} {err:?}");
        assert!(!got.contains("token-test-only"), "{got}");
        let logs = logs.contents();
        assert!(logs.contains("remote token revocation failed"), "{logs}");
        assert!(!logs.contains("token-test-only"), "{logs}");
    }

    #[tokio::test]
    async fn revoke_truncated_response() -> TestResult {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await?;
            let mut buf = [0_u8; 4096];
            let _ = stream.read(&mut buf).await?;
            stream
                .write_all(b"HTTP/1.1 503 Service Unavailable\r\ncontent-length: 100\r\n\r\ntruncated")
                .await?;
            stream.shutdown().await
        });

        let (logs, _guard) = capture_logs();
        let client = Builder::default()
            .with_revocation_endpoint(format!("http://{addr}/revoke"))
            .build();
        let status = client.revoke_token(test_token("s1"), None).await;
        server.await??;

        assert!(status.is_revoked(), "{status:?}");
        assert!(!status.is_confirmed(), "{status:?}");
        let err = status.error().expect("an unreadable response reports an error");
        assert!(err.is_revocation_failed(), "{err:?}");
        assert!(err.is_transient(), "{err:?}");
        assert_eq!(err.http_status(), Some(StatusCode::SERVICE_UNAVAILABLE));
        assert!(err.response_body().is_none(), "{err:?}");
        let got = format!("{err} {err:?}");
        assert!(!got.contains("token-test-only"), "{got}");
        let logs = logs.contents();
        assert!(
            logs.contains("cannot read the revocation endpoint response"),
            "{logs}"
        );
        assert!(!logs.contains("token-test-only"), "{logs}");
        Ok(())
    }

    #[tokio::test]
    async fn revoke_empty_slot() {
        // No expectations, any request fails the test.
        let server = Server::run();
        let client = test_client(&server);

        let mut slot = None;
        let status = client.revoke(&mut slot, None).await;
        assert!(slot.is_none(), "{slot:?}");
        assert!(status.is_revoked(), "{status:?}");
        assert!(!status.is_confirmed(), "{status:?}");
        assert!(status.error().is_none(), "{status:?}");
    }

    #[tokio::test]
    async fn revoke_token() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/revoke"),
                request::query(url_decoded(contains(("token", "token-test-only")))),
            ])
            .times(1)
            .respond_with(status_code(200)),
        );
        let client = test_client(&server);
        let status = client.revoke_token(test_token("s1"), None).await;
        assert!(status.is_confirmed(), "{status:?}");
    }
}
