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

//! Types and traits to request and use OAuth 2.0 access tokens.

use crate::Result;
use crate::constants::DEFAULT_TOKEN_TTL;
use crate::errors::CredentialsError;
use http::HeaderMap;
use http::header::{AUTHORIZATION, HeaderValue};
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;

/// An access token issued by the authorization server.
///
/// Tokens are only created by a successful exchange. They are never
/// refreshed, request a new token once this one [is expired][AccessToken::is_expired].
#[derive(Clone, PartialEq)]
pub struct AccessToken {
    /// The actual token string.
    ///
    /// This is the value used in `Authorization:` header.
    pub token: String,

    /// The type of the token.
    ///
    /// The most common type is `"Bearer"`.
    pub token_type: String,

    /// The space-separated scopes granted to the token.
    ///
    /// This is the value returned by the authorization server, or the
    /// requested scopes if the server did not return any.
    pub scope: String,

    /// The instant at which the token expires.
    pub expires_at: OffsetDateTime,
}

impl AccessToken {
    /// Returns `true` if the token is expired at `now`.
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        now >= self.expires_at
    }

    /// Returns `true` if the token is expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(OffsetDateTime::now_utc())
    }

    /// The individual scopes granted to the token.
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scope.split_ascii_whitespace()
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes().any(|s| s == scope)
    }

    /// Returns the headers to authenticate a request with this token.
    ///
    /// The `Authorization` header is marked as sensitive. Fails with an
    /// [invalid token][CredentialsError::is_invalid_token] error if the token
    /// contains characters not allowed in a header value.
    pub fn headers(&self) -> Result<HeaderMap> {
        let mut value = HeaderValue::from_str(&format!("{} {}", self.token_type, self.token))
            .map_err(CredentialsError::invalid_token)?;
        value.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[censored]")
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// The parameters of a JWT-bearer authorization grant.
///
/// # Example
/// ```
/// # use google_cloud_service_account::token::GrantRequest;
/// # use std::time::Duration;
/// let request = GrantRequest::new(["https://www.googleapis.com/auth/calendar"])
///     .with_ttl(Duration::from_secs(600))
///     .with_subject("user@example.com");
/// assert_eq!(request.scope(), "https://www.googleapis.com/auth/calendar");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GrantRequest {
    /// The requested scopes, sent in this order.
    pub scopes: Vec<String>,

    /// The requested lifetime of the assertion. Only whole seconds are used.
    pub ttl: Duration,

    /// The user impersonated by the service account, if any. Empty subjects
    /// are ignored.
    pub subject: Option<String>,
}

impl GrantRequest {
    /// Creates a request for `scopes` with the default lifetime of one hour.
    pub fn new<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scopes: scopes.into_iter().map(Into::into).collect(),
            ttl: DEFAULT_TOKEN_TTL,
            subject: None,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Requests a token to act on behalf of `subject`.
    ///
    /// This requires [domain-wide delegation].
    ///
    /// [domain-wide delegation]: https://support.google.com/a/answer/162106
    pub fn with_subject<S: Into<String>>(mut self, subject: S) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// The value of the `scope` claim, the scopes joined by spaces.
    pub fn scope(&self) -> String {
        self.scopes.join(" ")
    }
}

/// Exchanges an authorization grant for an access token.
///
/// Each call performs a fresh exchange, implementations do not cache or
/// retry.
#[async_trait::async_trait]
pub trait TokenExchange: std::fmt::Debug + Send + Sync {
    async fn exchange(&self, request: GrantRequest) -> Result<AccessToken>;
}

#[async_trait::async_trait]
impl<T: TokenExchange + ?Sized> TokenExchange for Arc<T> {
    async fn exchange(&self, request: GrantRequest) -> Result<AccessToken> {
        self.as_ref().exchange(request).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use test_case::test_case;

    // Used by tests in other modules.
    mockall::mock! {
        #[derive(Debug)]
        pub TokenExchange { }

        #[async_trait::async_trait]
        impl TokenExchange for TokenExchange {
            async fn exchange(&self, request: GrantRequest) -> Result<AccessToken>;
        }
    }

    pub(crate) fn test_token(scope: &str) -> AccessToken {
        AccessToken {
            token: "token-test-only".to_string(),
            token_type: "Bearer".to_string(),
            scope: scope.to_string(),
            expires_at: OffsetDateTime::now_utc() + Duration::from_secs(3600),
        }
    }

    #[test]
    fn debug() {
        let token = test_token("s1 s2");
        let got = format!("{token:?}");
        assert!(!got.contains("token-test-only"), "{got}");
        assert!(got.contains("token: \"[censored]\""), "{got}");
        assert!(got.contains("token_type: \"Bearer\""), "{got}");
        assert!(got.contains("scope: \"s1 s2\""), "{got}");
    }

    #[test_case(-10, true)]
    #[test_case(-1, true)]
    #[test_case(0, true)]
    #[test_case(1, false)]
    #[test_case(3600, false)]
    fn is_expired_at(offset: i64, want: bool) {
        let now = OffsetDateTime::now_utc();
        let token = AccessToken {
            expires_at: now + time::Duration::seconds(offset),
            ..test_token("s1")
        };
        assert_eq!(token.is_expired_at(now), want);
    }

    #[test]
    fn is_expired() {
        let token = test_token("s1");
        assert!(!token.is_expired(), "{token:?}");
        let token = AccessToken {
            expires_at: OffsetDateTime::now_utc() - Duration::from_secs(1),
            ..token
        };
        assert!(token.is_expired(), "{token:?}");
    }

    #[test]
    fn scopes() {
        let token = test_token("s1  s2 s3");
        assert_eq!(token.scopes().collect::<Vec<_>>(), vec!["s1", "s2", "s3"]);
        assert!(token.has_scope("s2"));
        assert!(!token.has_scope("s"));
        assert!(!token.has_scope(""));

        let token = test_token("");
        assert_eq!(token.scopes().count(), 0);
    }

    #[test]
    fn headers() -> anyhow::Result<()> {
        let token = test_token("s1");
        let headers = token.headers()?;
        let value = headers.get(AUTHORIZATION).expect("authorization header");
        assert_eq!(value, "Bearer token-test-only");
        assert!(value.is_sensitive());
        assert_eq!(headers.len(), 1);
        Ok(())
    }

    #[test]
    fn headers_invalid_value() {
        let token = AccessToken {
            token: "bad\ntoken".to_string(),
            ..test_token("s1")
        };
        let err = token.headers().unwrap_err();
        assert!(err.is_invalid_token(), "{err:?}");
        assert!(!err.is_token_request_failed(), "{err:?}");
        assert!(!err.is_transient(), "{err:?}");
        let got = format!("{err}");
        assert!(!got.contains("bad\ntoken"), "{got}");
    }

    #[test]
    fn grant_request() {
        let request = GrantRequest::new(["s1", "s2"]);
        assert_eq!(request.scopes, vec!["s1", "s2"]);
        assert_eq!(request.ttl, Duration::from_secs(3600));
        assert_eq!(request.subject, None);
        assert_eq!(request.scope(), "s1 s2");

        let request = request
            .with_ttl(Duration::from_secs(60))
            .with_subject("user@example.com");
        assert_eq!(request.ttl, Duration::from_secs(60));
        assert_eq!(request.subject.as_deref(), Some("user@example.com"));

        let request = GrantRequest::new(Vec::<String>::new());
        assert_eq!(request.scope(), "");
    }

    #[tokio::test]
    async fn arc_exchange() -> anyhow::Result<()> {
        let mut mock = MockTokenExchange::new();
        mock.expect_exchange()
            .withf(|r| r.scopes == vec!["s1"])
            .times(1)
            .return_once(|_| Ok(test_token("s1")));
        let exchange = Arc::new(mock);
        let token = exchange.exchange(GrantRequest::new(["s1"])).await?;
        assert_eq!(token.scope, "s1");
        Ok(())
    }
}
