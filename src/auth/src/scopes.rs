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

//! OAuth 2.0 scopes grouped by access level.
//!
//! Each API surface declares the scopes required for full access, read-only
//! access, and read-and-write access. The declaration is constant data, the
//! surfaces share the same exchange logic.
//!
//! # Example
//! ```
//! # use google_cloud_service_account::scopes::{ApiScopes, Calendar, ScopeTier};
//! assert_eq!(
//!     Calendar::SCOPES.scopes(ScopeTier::ReadOnly),
//!     &["https://www.googleapis.com/auth/calendar.readonly"]
//! );
//! ```

/// An access level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScopeTier {
    Full,
    ReadOnly,
    ReadAndWrite,
}

/// The scopes of an API surface, for each [ScopeTier].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScopeTiers {
    full: &'static [&'static str],
    read_only: &'static [&'static str],
    read_and_write: &'static [&'static str],
}

impl ScopeTiers {
    /// Creates the scope tiers of an API surface.
    ///
    /// The read-and-write scopes are the full scopes.
    pub const fn new(
        full: &'static [&'static str],
        read_only: &'static [&'static str],
    ) -> Self {
        Self {
            full,
            read_only,
            read_and_write: full,
        }
    }

    /// Overrides the read-and-write scopes.
    pub const fn with_read_and_write(self, read_and_write: &'static [&'static str]) -> Self {
        Self {
            read_and_write,
            ..self
        }
    }

    pub const fn full(&self) -> &'static [&'static str] {
        self.full
    }

    pub const fn read_only(&self) -> &'static [&'static str] {
        self.read_only
    }

    pub const fn read_and_write(&self) -> &'static [&'static str] {
        self.read_and_write
    }

    pub const fn scopes(&self, tier: ScopeTier) -> &'static [&'static str] {
        match tier {
            ScopeTier::Full => self.full,
            ScopeTier::ReadOnly => self.read_only,
            ScopeTier::ReadAndWrite => self.read_and_write,
        }
    }
}

/// Implemented by API surfaces to declare their scopes.
///
/// # Example
/// ```
/// # use google_cloud_service_account::scopes::{ApiScopes, ScopeTiers};
/// struct Gmail;
/// impl ApiScopes for Gmail {
///     const SCOPES: ScopeTiers = ScopeTiers::new(
///         &["https://mail.google.com/"],
///         &["https://www.googleapis.com/auth/gmail.readonly"],
///     )
///     .with_read_and_write(&["https://www.googleapis.com/auth/gmail.modify"]);
/// }
/// assert_eq!(Gmail::SCOPES.read_and_write(), &["https://www.googleapis.com/auth/gmail.modify"]);
/// ```
pub trait ApiScopes {
    const SCOPES: ScopeTiers;
}

/// The [Google Calendar API](https://developers.google.com/calendar/api).
#[derive(Clone, Copy, Debug)]
pub struct Calendar;

impl ApiScopes for Calendar {
    const SCOPES: ScopeTiers = ScopeTiers::new(
        &["https://www.googleapis.com/auth/calendar"],
        &["https://www.googleapis.com/auth/calendar.readonly"],
    );
}

/// Google Cloud APIs.
#[derive(Clone, Copy, Debug)]
pub struct CloudPlatform;

impl ApiScopes for CloudPlatform {
    const SCOPES: ScopeTiers = ScopeTiers::new(
        &["https://www.googleapis.com/auth/cloud-platform"],
        &["https://www.googleapis.com/auth/cloud-platform.read-only"],
    );
}

/// The [Google Drive API](https://developers.google.com/drive/api).
#[derive(Clone, Copy, Debug)]
pub struct Drive;

impl ApiScopes for Drive {
    const SCOPES: ScopeTiers = ScopeTiers::new(
        &["https://www.googleapis.com/auth/drive"],
        &["https://www.googleapis.com/auth/drive.readonly"],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const TEST_TIERS: ScopeTiers = ScopeTiers::new(&["full"], &["ro"]);

    #[test]
    fn read_and_write_defaults_to_full() {
        assert_eq!(TEST_TIERS.full(), &["full"]);
        assert_eq!(TEST_TIERS.read_only(), &["ro"]);
        assert_eq!(TEST_TIERS.read_and_write(), &["full"]);
    }

    #[test]
    fn with_read_and_write() {
        const TIERS: ScopeTiers = TEST_TIERS.with_read_and_write(&["rw1", "rw2"]);
        assert_eq!(TIERS.full(), &["full"]);
        assert_eq!(TIERS.read_only(), &["ro"]);
        assert_eq!(TIERS.read_and_write(), &["rw1", "rw2"]);
    }

    #[test_case(ScopeTier::Full, &["full"])]
    #[test_case(ScopeTier::ReadOnly, &["ro"])]
    #[test_case(ScopeTier::ReadAndWrite, &["full"])]
    fn scopes(tier: ScopeTier, want: &[&str]) {
        assert_eq!(TEST_TIERS.scopes(tier), want);
    }

    #[test_case(Calendar::SCOPES, "https://www.googleapis.com/auth/calendar", ".readonly")]
    #[test_case(CloudPlatform::SCOPES, "https://www.googleapis.com/auth/cloud-platform", ".read-only")]
    #[test_case(Drive::SCOPES, "https://www.googleapis.com/auth/drive", ".readonly")]
    fn surfaces(tiers: ScopeTiers, full: &str, suffix: &str) {
        assert_eq!(tiers.full(), &[full]);
        assert_eq!(tiers.read_only(), &[format!("{full}{suffix}").as_str()]);
        assert_eq!(tiers.read_and_write(), tiers.full());
    }
}
