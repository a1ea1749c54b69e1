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

//! Errors created while signing assertions, requesting tokens, and revoking
//! them.

use http::StatusCode;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter, Result};
use std::sync::Arc;

/// Represents an error using a service account key.
///
/// The error distinguishes four failure modes:
///
/// * The signing key could not be derived from the service account key, see
///   [is_key_unavailable][CredentialsError::is_key_unavailable]. These errors
///   are never transient.
/// * The token endpoint rejected the request, or could not be reached, see
///   [is_token_request_failed][CredentialsError::is_token_request_failed].
/// * The revocation endpoint rejected the request, or could not be reached,
///   see [is_revocation_failed][CredentialsError::is_revocation_failed].
/// * An issued token cannot be used in a request, see
///   [is_invalid_token][CredentialsError::is_invalid_token].
///
/// When the failure comes from an HTTP response the status code and the
/// response body are available via [http_status][CredentialsError::http_status]
/// and [response_body][CredentialsError::response_body].
#[derive(Clone, Debug)]
pub struct CredentialsError {
    kind: ErrorKind,

    /// If `true`, the operation that resulted in this error might succeed upon
    /// retry. Applications should use [Exponential backoff] in their retry
    /// loops.
    ///
    /// [Exponential backoff]: https://en.wikipedia.org/wiki/Exponential_backoff
    is_transient: bool,

    http_status: Option<StatusCode>,
    response_body: Option<String>,

    source: CredentialsErrorImpl,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum ErrorKind {
    KeyUnavailable,
    TokenRequest,
    Revocation,
    InvalidToken,
}

#[derive(Clone, Debug)]
enum CredentialsErrorImpl {
    SimpleMessage(String),
    Source(Arc<dyn Error + Send + Sync>),
}

impl CredentialsError {
    fn new(kind: ErrorKind, is_transient: bool, source: CredentialsErrorImpl) -> Self {
        Self {
            kind,
            is_transient,
            http_status: None,
            response_body: None,
            source,
        }
    }

    fn with_response(mut self, status: StatusCode, body: String) -> Self {
        self.http_status = Some(status);
        self.response_body = Some(body);
        self
    }

    /// The signing key could not be derived from the service account key.
    pub fn is_key_unavailable(&self) -> bool {
        self.kind == ErrorKind::KeyUnavailable
    }

    /// The token endpoint did not return a usable access token.
    pub fn is_token_request_failed(&self) -> bool {
        self.kind == ErrorKind::TokenRequest
    }

    /// The revocation endpoint did not confirm the revocation.
    pub fn is_revocation_failed(&self) -> bool {
        self.kind == ErrorKind::Revocation
    }

    /// The token was issued but its value cannot be sent in an HTTP header.
    pub fn is_invalid_token(&self) -> bool {
        self.kind == ErrorKind::InvalidToken
    }

    /// Returns `true` if the error is transient and the operation may succeed
    /// if retried.
    pub fn is_transient(&self) -> bool {
        self.is_transient
    }

    /// The HTTP status code returned by the endpoint, if any.
    pub fn http_status(&self) -> Option<StatusCode> {
        self.http_status
    }

    /// The body of the HTTP response returned by the endpoint, if any.
    pub fn response_body(&self) -> Option<&str> {
        self.response_body.as_deref()
    }

    pub(crate) fn key_unavailable<T: Error + Send + Sync + 'static>(source: T) -> Self {
        Self::new(
            ErrorKind::KeyUnavailable,
            false,
            CredentialsErrorImpl::Source(Arc::new(source)),
        )
    }

    pub(crate) fn key_unavailable_from_str<T: Into<String>>(message: T) -> Self {
        Self::new(
            ErrorKind::KeyUnavailable,
            false,
            CredentialsErrorImpl::SimpleMessage(message.into()),
        )
    }

    /// A token request that failed before a response was received.
    pub(crate) fn token_request<T: Error + Send + Sync + 'static>(
        is_transient: bool,
        source: T,
    ) -> Self {
        Self::new(
            ErrorKind::TokenRequest,
            is_transient,
            CredentialsErrorImpl::Source(Arc::new(source)),
        )
    }

    pub(crate) fn token_request_from_str<T: Into<String>>(is_transient: bool, message: T) -> Self {
        Self::new(
            ErrorKind::TokenRequest,
            is_transient,
            CredentialsErrorImpl::SimpleMessage(message.into()),
        )
    }

    /// A token request that received an unusable response.
    pub(crate) fn token_response<T: Into<String>>(
        status: StatusCode,
        body: String,
        message: T,
    ) -> Self {
        Self::token_request_from_str(is_retryable(status), message).with_response(status, body)
    }

    pub(crate) fn revocation<T: Error + Send + Sync + 'static>(
        is_transient: bool,
        source: T,
    ) -> Self {
        Self::new(
            ErrorKind::Revocation,
            is_transient,
            CredentialsErrorImpl::Source(Arc::new(source)),
        )
    }

    pub(crate) fn revocation_response(status: StatusCode, body: String) -> Self {
        Self::new(
            ErrorKind::Revocation,
            is_retryable(status),
            CredentialsErrorImpl::SimpleMessage(format!(
                "revocation endpoint returned status {status}"
            )),
        )
        .with_response(status, body)
    }

    /// The revocation endpoint responded, but the body could not be read.
    pub(crate) fn revocation_unreadable<T: Error + Send + Sync + 'static>(
        status: StatusCode,
        source: T,
    ) -> Self {
        let mut error = Self::new(
            ErrorKind::Revocation,
            true,
            CredentialsErrorImpl::Source(Arc::new(source)),
        );
        error.http_status = Some(status);
        error
    }

    pub(crate) fn invalid_token<T: Error + Send + Sync + 'static>(source: T) -> Self {
        Self::new(
            ErrorKind::InvalidToken,
            false,
            CredentialsErrorImpl::Source(Arc::new(source)),
        )
    }
}

impl std::error::Error for CredentialsErrorImpl {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            CredentialsErrorImpl::SimpleMessage(_) => None,
            CredentialsErrorImpl::Source(source) => Some(source.as_ref()),
        }
    }
}

impl Display for CredentialsErrorImpl {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match &self {
            CredentialsErrorImpl::SimpleMessage(message) => write!(f, "{message}"),
            CredentialsErrorImpl::Source(source) => write!(f, "{source}"),
        }
    }
}

impl std::error::Error for CredentialsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.source()
    }
}

const TRANSIENT_MSG: &str = "but future attempts may succeed";
const PERMANENT_MSG: &str = "and future attempts will not succeed";

impl Display for CredentialsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let what = match self.kind {
            ErrorKind::KeyUnavailable => "cannot create signing key",
            ErrorKind::TokenRequest => "cannot create access token",
            ErrorKind::Revocation => "cannot revoke access token",
            ErrorKind::InvalidToken => "cannot use access token",
        };
        let msg = if self.is_transient {
            TRANSIENT_MSG
        } else {
            PERMANENT_MSG
        };
        write!(f, "{what}, {msg}, source:{}", self.source)
    }
}

pub(crate) fn is_retryable(c: StatusCode) -> bool {
    match c {
        // Internal server errors do not indicate that there is anything wrong
        // with our request, so we retry them.
        StatusCode::INTERNAL_SERVER_ERROR
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::REQUEST_TIMEOUT
        | StatusCode::TOO_MANY_REQUESTS => true,
        _ => false,
    }
}
