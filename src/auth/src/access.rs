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

//! Request access to an API surface by access level.
//!
//! [TieredAccess] combines a [TokenExchange] with the [ScopeTiers] of an API
//! surface. Its operations never fail, errors are logged and reported as
//! `false` (or `None`).
//!
//! # Example
//! ```no_run
//! # use google_cloud_service_account::access::TieredAccess;
//! # use google_cloud_service_account::credentials::service_account::Builder;
//! # use google_cloud_service_account::scopes::Calendar;
//! # use std::time::Duration;
//! # tokio_test::block_on(async {
//! let client = Builder::new(serde_json::json!({"type": "service_account"})).build()?;
//! let access = TieredAccess::for_api::<Calendar>(client);
//! if access.request_read_only_access(Duration::from_secs(600)).await {
//!     println!("the service account can read calendars");
//! }
//! # Ok::<(), google_cloud_service_account::build_errors::Error>(())
//! # });
//! ```

use crate::scopes::{ApiScopes, ScopeTier, ScopeTiers};
use crate::token::{AccessToken, GrantRequest, TokenExchange};
use std::time::Duration;

/// Requests tokens for the read-only or read-and-write scopes of an API.
#[derive(Debug)]
pub struct TieredAccess<E> {
    exchange: E,
    tiers: ScopeTiers,
}

impl<E> TieredAccess<E>
where
    E: TokenExchange,
{
    pub fn new(exchange: E, tiers: ScopeTiers) -> Self {
        Self { exchange, tiers }
    }

    /// Uses the scopes declared by the API surface `S`.
    pub fn for_api<S: ApiScopes>(exchange: E) -> Self {
        Self::new(exchange, S::SCOPES)
    }

    pub fn tiers(&self) -> &ScopeTiers {
        &self.tiers
    }

    /// Returns `true` if a token for the read-only scopes was issued.
    ///
    /// The token is discarded, use
    /// [request_read_only_access_with_token][Self::request_read_only_access_with_token]
    /// to keep it.
    pub async fn request_read_only_access(&self, ttl: Duration) -> bool {
        self.request_read_only_access_with_token(ttl).await.is_some()
    }

    /// Returns `true` if a token for the read-and-write scopes was issued.
    ///
    /// The token is discarded, use
    /// [request_read_and_write_access_with_token][Self::request_read_and_write_access_with_token]
    /// to keep it.
    pub async fn request_read_and_write_access(&self, ttl: Duration) -> bool {
        self.request_read_and_write_access_with_token(ttl)
            .await
            .is_some()
    }

    /// Requests a token for the read-only scopes.
    pub async fn request_read_only_access_with_token(&self, ttl: Duration) -> Option<AccessToken> {
        self.request(ScopeTier::ReadOnly, ttl).await
    }

    /// Requests a token for the read-and-write scopes.
    pub async fn request_read_and_write_access_with_token(
        &self,
        ttl: Duration,
    ) -> Option<AccessToken> {
        self.request(ScopeTier::ReadAndWrite, ttl).await
    }

    async fn request(&self, tier: ScopeTier, ttl: Duration) -> Option<AccessToken> {
        let request = GrantRequest::new(self.tiers.scopes(tier).iter().copied()).with_ttl(ttl);
        match self.exchange.exchange(request).await {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::debug!(?tier, "access request failed: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CredentialsError;
    use crate::scopes::Calendar;
    use crate::token::tests::{MockTokenExchange, test_token};
    use http::StatusCode;
    use test_case::test_case;

    const READ_ONLY: &str = "https://www.googleapis.com/auth/calendar.readonly";
    const FULL: &str = "https://www.googleapis.com/auth/calendar";

    fn token_request_failed() -> CredentialsError {
        CredentialsError::token_response(StatusCode::BAD_REQUEST, "{}".to_string(), "bad request")
    }

    fn transient() -> CredentialsError {
        CredentialsError::token_response(StatusCode::SERVICE_UNAVAILABLE, String::new(), "retry")
    }

    fn key_unavailable() -> CredentialsError {
        CredentialsError::key_unavailable_from_str("no key")
    }

    #[tokio::test]
    async fn read_only_success() {
        let mut mock = MockTokenExchange::new();
        mock.expect_exchange()
            .withf(|r| r.scopes == vec![READ_ONLY] && r.ttl == Duration::from_secs(600))
            .times(1)
            .return_once(|_| Ok(test_token(READ_ONLY)));

        let access = TieredAccess::for_api::<Calendar>(mock);
        assert!(access.request_read_only_access(Duration::from_secs(600)).await);
    }

    #[tokio::test]
    async fn read_and_write_success() {
        let mut mock = MockTokenExchange::new();
        mock.expect_exchange()
            .withf(|r| r.scopes == vec![FULL] && r.subject.is_none())
            .times(1)
            .return_once(|_| Ok(test_token(FULL)));

        let access = TieredAccess::for_api::<Calendar>(mock);
        assert!(
            access
                .request_read_and_write_access(Duration::from_secs(3600))
                .await
        );
    }

    #[test_case(token_request_failed())]
    #[test_case(transient())]
    #[test_case(key_unavailable())]
    #[tokio::test]
    async fn failures_are_false(error: CredentialsError) {
        let mut mock = MockTokenExchange::new();
        let e = error.clone();
        mock.expect_exchange()
            .times(2)
            .returning(move |_| Err(e.clone()));

        let access = TieredAccess::for_api::<Calendar>(mock);
        assert!(!access.request_read_only_access(Duration::from_secs(60)).await);
        assert!(
            !access
                .request_read_and_write_access(Duration::from_secs(60))
                .await
        );
    }

    #[tokio::test]
    async fn with_token() {
        let mut mock = MockTokenExchange::new();
        mock.expect_exchange()
            .times(1)
            .returning(|r| Ok(test_token(&r.scope())));

        let access = TieredAccess::new(
            mock,
            ScopeTiers::new(&["full"], &["ro"]).with_read_and_write(&["rw1", "rw2"]),
        );
        let token = access
            .request_read_and_write_access_with_token(Duration::from_secs(60))
            .await
            .expect("exchange succeeds");
        assert_eq!(token.scope, "rw1 rw2");
        assert_eq!(access.tiers().read_only(), &["ro"]);
    }

    #[tokio::test]
    async fn with_token_failure() {
        let mut mock = MockTokenExchange::new();
        mock.expect_exchange()
            .times(1)
            .returning(|_| Err(token_request_failed()));

        let access = TieredAccess::for_api::<Calendar>(mock);
        let got = access
            .request_read_only_access_with_token(Duration::from_secs(60))
            .await;
        assert!(got.is_none(), "{got:?}");
    }
}
