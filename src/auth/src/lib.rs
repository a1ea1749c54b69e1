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

//! Google service account authorization for Rust.
//!
//! This crate issues OAuth 2.0 access tokens for a [service account] using
//! the [JWT-bearer grant]. A service account key is parsed into a
//! [ServiceAccountKey], an assertion is signed with its private key, and the
//! assertion is exchanged for an [AccessToken] at the token endpoint.
//!
//! On top of the exchange, [TieredAccess] requests read-only or read-and-write
//! access to an API surface, using the scopes the surface declares through
//! [ApiScopes].
//!
//! The crate does not cache or refresh tokens, each request performs a fresh
//! exchange.
//!
//! Signing uses the process-default [rustls crypto provider]. With the
//! `default-rustls-provider` feature (enabled by default) the crate falls back
//! to `aws-lc-rs` when no provider is installed.
//!
//! [AccessToken]: token::AccessToken
//! [ApiScopes]: scopes::ApiScopes
//! [JWT-bearer grant]: https://datatracker.ietf.org/doc/html/rfc7523
//! [rustls crypto provider]: https://docs.rs/rustls/latest/rustls/crypto/struct.CryptoProvider.html
//! [service account]: https://cloud.google.com/iam/docs/service-account-overview
//! [ServiceAccountKey]: credentials::service_account::ServiceAccountKey
//! [TieredAccess]: access::TieredAccess

pub mod access;
pub mod build_errors;
pub(crate) mod constants;
pub mod credentials;
pub mod errors;
pub mod metadata;
pub mod oauth2;
pub mod scopes;

/// Types and traits to work with OAuth 2.0 access tokens.
pub mod token;

pub use constants::DEFAULT_TOKEN_TTL;

/// A `Result` alias where the `Err` case is
/// `google_cloud_service_account::errors::CredentialsError`.
pub type Result<T> = std::result::Result<T, crate::errors::CredentialsError>;

/// A `Result` alias where the `Err` case is
/// `google_cloud_service_account::build_errors::Error`.
pub type BuildResult<T> = std::result::Result<T, crate::build_errors::Error>;
