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

use std::time::Duration;

/// The only credential `type` accepted by this crate.
pub(crate) const SERVICE_ACCOUNT_TYPE: &str = "service_account";

/// JWT Bearer OAuth Grant Type, see [RFC 7523].
///
/// [RFC 7523]: https://datatracker.ietf.org/doc/html/rfc7523
pub(crate) const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

pub(crate) const GOOGLE_ISSUER: &str = "https://accounts.google.com";
pub(crate) const GOOGLE_AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub(crate) const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
pub(crate) const GOOGLE_REVOCATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/revoke";
pub(crate) const GOOGLE_JWKS_URI: &str = "https://www.googleapis.com/oauth2/v3/certs";

/// The environment variable pointing at a service account key file.
pub(crate) const GOOGLE_APPLICATION_CREDENTIALS_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// The default lifetime requested for an assertion, and therefore for the
/// access token issued in exchange.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(3600);
