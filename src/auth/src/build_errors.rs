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

//! Errors created while loading and parsing service account keys.

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type for [ServiceAccountKey] construction and client builders.
///
/// Every value of this type means the credential document is invalid: it
/// could not be read, it is not a JSON object, it is empty, or it does not
/// describe a service account. These errors are never transient, retrying
/// with the same input produces the same error.
///
/// [ServiceAccountKey]: crate::credentials::service_account::ServiceAccountKey
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub struct Error(ErrorKind);

impl Error {
    /// The credential document is invalid.
    ///
    /// This is true for all errors of this type, it is provided for
    /// symmetry with the predicates in [CredentialsError][crate::errors::CredentialsError].
    pub fn is_invalid_credential(&self) -> bool {
        true
    }

    /// A problem finding or reading the credentials file.
    pub fn is_loading(&self) -> bool {
        matches!(self.0, ErrorKind::Loading(_))
    }

    /// The credentials are not a valid JSON object.
    pub fn is_parsing(&self) -> bool {
        matches!(self.0, ErrorKind::Parsing(_))
    }

    /// The credentials document has no fields.
    pub fn is_empty(&self) -> bool {
        matches!(self.0, ErrorKind::Empty)
    }

    /// The credentials document has no `type` field.
    pub fn is_missing_type(&self) -> bool {
        matches!(self.0, ErrorKind::MissingType)
    }

    /// The `type` field is not `service_account`.
    pub fn is_unknown_type(&self) -> bool {
        matches!(self.0, ErrorKind::UnknownType(_))
    }

    pub(crate) fn loading<T>(source: T) -> Error
    where
        T: Into<BoxError>,
    {
        Error(ErrorKind::Loading(source.into()))
    }

    pub(crate) fn parsing<T>(source: T) -> Error
    where
        T: Into<BoxError>,
    {
        Error(ErrorKind::Parsing(source.into()))
    }

    pub(crate) fn empty() -> Error {
        Error(ErrorKind::Empty)
    }

    pub(crate) fn missing_type() -> Error {
        Error(ErrorKind::MissingType)
    }

    pub(crate) fn unknown_type<T: Into<String>>(credential_type: T) -> Error {
        Error(ErrorKind::UnknownType(credential_type.into()))
    }
}

#[derive(thiserror::Error, Debug)]
enum ErrorKind {
    #[error("could not find or open the credentials file: {0}")]
    Loading(#[source] BoxError),
    #[error("cannot parse the credentials document: {0}")]
    Parsing(#[source] BoxError),
    #[error("the credentials document is empty")]
    Empty,
    #[error("the credentials document is missing the `type` field")]
    MissingType,
    #[error("invalid credentials type `{0}`, expected `service_account`")]
    UnknownType(String),
}
